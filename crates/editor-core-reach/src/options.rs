//! User-adjustable behavior.
//!
//! Hosts typically keep these in their own preference store and hand a fresh [`Options`]
//! to every execution. [`Options::from_toml_str`] accepts a (possibly partial) TOML table
//! with kebab-case keys; missing keys fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::ReachError;

/// Where delete-left stops inside leading indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndentStop {
    /// Always delete to column 0.
    No,
    /// Stop at the first non-whitespace character.
    Yes,
    /// Stop at the first non-whitespace character, rounded down to the indent unit.
    RoundToStep,
}

/// How multiline to-pattern commands scan the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// One line at a time; matches never span lines.
    LineByLine,
    /// The whole text before/after the anchor as one string; matches may span lines.
    InBlock,
}

/// What to do when a pattern is not found for a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotFoundPolicy {
    /// Ask once for the whole batch.
    AskPerExecution,
    /// Ask for every selection without a match.
    AskPerSelection,
    /// Process everything up to the line (or buffer) edge.
    ProcessEverything,
    /// Leave the selection alone.
    SkipSelection,
}

/// Whether overwrite-mode deletions at line end become spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpacePolicy {
    /// Delete.
    No,
    /// Replace with spaces.
    Yes,
    /// Ask once for the whole batch.
    AskPerExecution,
    /// Ask for every affected range.
    AskPerSelection,
}

/// A pattern offered to the user by the host's pattern prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredefinedPattern {
    /// Display label.
    pub label: String,
    /// Literal or `/regex/flags` value.
    pub value: String,
    /// Optional pre-selected character span inside `value` (start, end).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<(usize, usize)>,
}

impl PredefinedPattern {
    fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            selection: None,
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Options {
    /// Delete-left stop rule inside indentation (select-left always stops).
    pub stop_at_indent: IndentStop,
    /// Treat an anchor inside leading indentation as sitting at the start of its line.
    pub move_on_indent: bool,
    /// After a left hand-off, keep the previous line's trailing whitespace.
    pub preserve_left_line_spaces: bool,
    /// After a right hand-off, keep the next line's leading whitespace.
    pub preserve_right_line_spaces: bool,
    /// Keep walking over blank lines during an edge hand-off.
    pub collect_empty_lines: bool,
    /// Multiline to-pattern scanning strategy.
    pub search_mode: SearchMode,
    /// Not-found policy for single-line to-pattern commands.
    pub not_found: NotFoundPolicy,
    /// Not-found policy for multiline to-pattern commands.
    pub not_found_multiline: NotFoundPolicy,
    /// Overwrite-mode policy for ranges with nothing after them on their line.
    pub replace_with_spaces: SpacePolicy,
    /// Change-selection-direction flips immediately when all selections agree.
    pub auto_flip_direction: bool,
    /// Patterns offered by the host's pattern prompt.
    pub predefined_patterns: Vec<PredefinedPattern>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            stop_at_indent: IndentStop::RoundToStep,
            move_on_indent: true,
            preserve_left_line_spaces: true,
            preserve_right_line_spaces: false,
            collect_empty_lines: true,
            search_mode: SearchMode::LineByLine,
            not_found: NotFoundPolicy::AskPerExecution,
            not_found_multiline: NotFoundPolicy::AskPerExecution,
            replace_with_spaces: SpacePolicy::No,
            auto_flip_direction: true,
            predefined_patterns: vec![
                PredefinedPattern::new("Comment", r"/\/\/|\/\*|\*\//"),
                PredefinedPattern {
                    label: "End of block at indent".to_string(),
                    value: r"/^(?:\s{4}){1}(?:[\)\]\}]|</[a-z-]+>)/".to_string(),
                    selection: Some((12, 13)),
                },
                PredefinedPattern::new("Comma or end", r"/,\s*$|$/"),
            ],
        }
    }
}

impl Options {
    /// Parse options from TOML. Unknown keys are rejected, missing keys use defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ReachError> {
        Ok(toml::from_str(source)?)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, ReachError> {
        Ok(toml::to_string(self)?)
    }

    /// The not-found policy for a command.
    pub fn not_found_policy(&self, multiline: bool) -> NotFoundPolicy {
        if multiline {
            self.not_found_multiline
        } else {
            self.not_found
        }
    }

    /// Whether hand-off whitespace is kept for a command reaching in `direction`.
    pub(crate) fn preserve_line_spaces(&self, direction: crate::Direction) -> bool {
        if direction.is_left() {
            self.preserve_left_line_spaces
        } else {
            self.preserve_right_line_spaces
        }
    }
}
