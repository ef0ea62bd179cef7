//! Single-line destination resolution.
//!
//! Covers plain left/right commands (delete/select everything left or right of the caret) and
//! single-line to-pattern commands. A plain command whose whole batch sits on a line edge
//! is handed off to the adjacent line, see [`crate::multiline`].

use crate::buffer::TextBuffer;
use crate::options::{IndentStop, Options};
use crate::pattern::Pattern;
use crate::position::{Direction, Position};
use crate::selection::Selection;
use crate::text::{char_len, char_slice, first_non_whitespace, is_blank, trailing_whitespace_start};

/// Outcome of resolving one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Where the edit/selection reaches, or `None` when there is nothing to do.
    pub destination: Option<Position>,
    /// The pattern was not found; the not-found policy decides before this is used.
    pub verify_selection: bool,
}

impl Resolution {
    /// A settled destination.
    pub fn at(destination: Position) -> Self {
        Self {
            destination: Some(destination),
            verify_selection: false,
        }
    }

    /// A fallback destination that still needs the not-found policy.
    pub fn not_found(fallback: Position) -> Self {
        Self {
            destination: Some(fallback),
            verify_selection: true,
        }
    }

    /// No destination (e.g. reaching past the first or last line).
    pub fn unresolved() -> Self {
        Self {
            destination: None,
            verify_selection: false,
        }
    }
}

/// How far a leftward reach goes inside leading indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentRule {
    /// Stop at the first non-whitespace character instead of column 0.
    pub stop: bool,
    /// Round the stop down to a multiple of this width.
    pub step: Option<usize>,
}

impl IndentRule {
    /// Rule for a command: select-to always stops, and so does the right-hand hand-off
    /// (which trims the next line's indentation). Rounding only applies to delete-left.
    pub fn for_command(
        options: &Options,
        select: bool,
        direction: Direction,
        indent_unit: usize,
    ) -> Self {
        let stop = select
            || !direction.is_left()
            || matches!(options.stop_at_indent, IndentStop::Yes | IndentStop::RoundToStep);
        let round = !select
            && direction.is_left()
            && options.stop_at_indent == IndentStop::RoundToStep;

        Self {
            stop,
            step: round.then_some(indent_unit.max(1)),
        }
    }
}

/// Destination character for "everything left of `search_from`".
///
/// With a stopping rule this is the first non-whitespace character, unless the anchor already
/// sits at or inside the indentation, in which case it collapses to column 0.
pub fn everything_left_char(text: &str, search_from: usize, rule: IndentRule) -> usize {
    if !rule.stop {
        return 0;
    }

    let first = first_non_whitespace(text).min(search_from);
    let destination = if first == search_from { 0 } else { first };

    match rule.step {
        Some(step) => destination / step * step,
        None => destination,
    }
}

/// Destination character of `pattern` on one line, or `None` when it does not match.
///
/// - Right: first match in `text[search_from..]`; the boundary sits after the match when
///   `include` is set, before it otherwise.
/// - Left: last match in `text[..search_from]`; the boundary sits before the match when
///   `include` is set, after it otherwise.
///
/// `search_from` defaults to the end of the line (left) or its start (right).
pub fn string_index(
    text: &str,
    pattern: &Pattern,
    search_from: Option<usize>,
    include: bool,
    direction: Direction,
) -> Option<usize> {
    let len = char_len(text);
    let from = search_from
        .unwrap_or(if direction.is_left() { len } else { 0 })
        .min(len);

    match direction {
        Direction::Left => {
            let found = pattern.last_in(char_slice(text, 0, from))?;
            Some(found.start + if include { 0 } else { found.len() })
        }
        Direction::Right => {
            let found = pattern.first_in(char_slice(text, from, len))?;
            Some(from + found.start + if include { found.len() } else { 0 })
        }
    }
}

/// `true` if `character` sits on the edge of `text` that `direction` reaches toward.
///
/// Left edge: column 0, or anywhere inside leading whitespace when `move_on_indent` is set.
/// Right edge: end of line, or anywhere inside trailing whitespace.
pub fn is_at_line_edge(
    text: &str,
    character: usize,
    direction: Direction,
    move_on_indent: bool,
) -> bool {
    match direction {
        Direction::Left if move_on_indent => is_blank(char_slice(text, 0, character)),
        Direction::Left => character == 0,
        Direction::Right => {
            character >= char_len(text) || is_blank(char_slice(text, character, char_len(text)))
        }
    }
}

/// The end of a selection a command reaches from.
pub fn anchor_of(selection: &Selection, direction: Direction) -> Position {
    match direction {
        Direction::Left => selection.start(),
        Direction::Right => selection.end(),
    }
}

/// The end of a selection a command keeps fixed.
pub fn fixed_end_of(selection: &Selection, direction: Direction) -> Position {
    match direction {
        Direction::Left => selection.end(),
        Direction::Right => selection.start(),
    }
}

/// Per-execution resolution context shared by every selection of a batch.
#[derive(Debug)]
pub struct Resolver<'a, B: TextBuffer + ?Sized> {
    pub(crate) buffer: &'a B,
    pub(crate) options: &'a Options,
    pub(crate) select: bool,
}

impl<'a, B: TextBuffer + ?Sized> Resolver<'a, B> {
    /// Create a resolver for one command execution.
    pub fn new(buffer: &'a B, options: &'a Options, select: bool) -> Self {
        Self {
            buffer,
            options,
            select,
        }
    }

    pub(crate) fn indent_rule(&self, direction: Direction) -> IndentRule {
        IndentRule::for_command(
            self.options,
            self.select,
            direction,
            self.buffer.indent_unit(),
        )
    }

    /// Plain left/right: reach to the line edge, or hand off to the adjacent line when
    /// `batch_at_edge` says every selection of the batch sits on the edge.
    pub fn resolve_plain(
        &self,
        selection: &Selection,
        direction: Direction,
        batch_at_edge: bool,
    ) -> Resolution {
        let anchor = anchor_of(selection, direction);
        let Some(text) = self.buffer.line_text(anchor.line) else {
            return Resolution::unresolved();
        };

        if batch_at_edge
            && is_at_line_edge(&text, anchor.character, direction, self.options.move_on_indent)
        {
            return self.resolve_hand_off(anchor.line, direction);
        }

        let character = match direction {
            Direction::Left => {
                everything_left_char(&text, anchor.character, self.indent_rule(Direction::Left))
            }
            Direction::Right if self.select => {
                // Stop before trailing whitespace unless already there.
                let content_end = trailing_whitespace_start(&text);
                if content_end == anchor.character {
                    char_len(&text)
                } else {
                    content_end
                }
            }
            Direction::Right => char_len(&text),
        };

        Resolution::at(Position::new(anchor.line, character))
    }

    /// Single-line to-pattern.
    ///
    /// `pattern == None` (an empty user string) resolves straight to the line-edge fallback
    /// without asking for the not-found policy.
    pub fn resolve_to_pattern(
        &self,
        selection: &Selection,
        pattern: Option<&Pattern>,
        include: bool,
        direction: Direction,
    ) -> Resolution {
        let anchor = anchor_of(selection, direction);
        let Some(text) = self.buffer.line_text(anchor.line) else {
            return Resolution::unresolved();
        };

        if let Some(pattern) = pattern
            && let Some(character) =
                string_index(&text, pattern, Some(anchor.character), include, direction)
        {
            return Resolution::at(Position::new(anchor.line, character));
        }

        let fallback = match direction {
            Direction::Left => {
                everything_left_char(&text, anchor.character, self.indent_rule(Direction::Left))
            }
            Direction::Right => char_len(&text),
        };
        let fallback = Position::new(anchor.line, fallback);

        if pattern.is_some() {
            Resolution::not_found(fallback)
        } else {
            Resolution::at(fallback)
        }
    }
}
