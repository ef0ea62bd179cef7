//! Selections and edit ranges exchanged with the host buffer.

use crate::position::{Position, Range};

/// Selection direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionDirection {
    /// Anchor on the left, head on the right.
    LeftToRight,
    /// Anchor on the right, head on the left.
    RightToLeft,
}

impl SelectionDirection {
    /// The direction encoded by a range's `reversed` flag.
    pub fn of(range: &Range) -> Self {
        if range.reversed {
            Self::RightToLeft
        } else {
            Self::LeftToRight
        }
    }

    /// Value of the `reversed` flag that produces this direction.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::RightToLeft)
    }
}

/// One caret/selection of a multi-selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    /// Normalized span; `range.reversed` decides anchor/head order on write-back.
    pub range: Range,
    /// Exactly one selection of a set is primary.
    pub primary: bool,
}

impl Selection {
    /// Create a selection from an anchor and a head.
    pub fn new(anchor: Position, head: Position) -> Self {
        Self {
            range: Range::new(anchor, head),
            primary: false,
        }
    }

    /// Create a collapsed selection (caret).
    pub fn caret(pos: Position) -> Self {
        Self::new(pos, pos)
    }

    /// Wrap an existing range.
    pub fn from_range(range: Range) -> Self {
        Self {
            range,
            primary: false,
        }
    }

    /// Mark this selection as primary.
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Textually-earlier endpoint.
    pub fn start(&self) -> Position {
        self.range.start
    }

    /// Textually-later endpoint.
    pub fn end(&self) -> Position {
        self.range.end
    }

    /// Returns `true` if the selection is a caret.
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Current selection direction.
    pub fn direction(&self) -> SelectionDirection {
        SelectionDirection::of(&self.range)
    }
}

/// Make sure exactly one selection is primary, defaulting to the first one.
pub(crate) fn ensure_single_primary(selections: &mut [Selection]) {
    let primary_index = selections.iter().position(|s| s.primary).unwrap_or(0);
    for (index, selection) in selections.iter_mut().enumerate() {
        selection.primary = index == primary_index;
    }
}

/// A resolved destination range plus the replacement text to put there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRange {
    /// Span covered by the edit or the new selection.
    pub range: Range,
    /// Replacement text (empty for a pure deletion).
    pub text: String,
    /// Set on select-to results that equal the selection they came from.
    pub no_change: bool,
}

impl EditRange {
    /// A deletion over `range`.
    pub fn new(range: Range) -> Self {
        Self {
            range,
            text: String::new(),
            no_change: false,
        }
    }

    /// Same range, flagged as unchanged.
    pub fn unchanged(range: Range) -> Self {
        Self {
            range,
            text: String::new(),
            no_change: true,
        }
    }

    /// Convert to the edit submitted to the buffer.
    pub fn to_text_edit(&self) -> TextEdit {
        TextEdit {
            range: self.range,
            text: self.text.clone(),
        }
    }
}

/// A single replacement submitted to [`crate::TextBuffer::apply_edits`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Span to replace, in pre-edit coordinates.
    pub range: Range,
    /// Inserted text (empty to delete).
    pub text: String,
}
