//! Positions, ranges and directions.
//!
//! All coordinates are **logical**: a zero-based line index and a zero-based character
//! (Unicode scalar value) offset inside that line. Line breaks are not addressable characters.

use std::cmp::Ordering;

/// Position coordinates (line and character offset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based offset in characters within the logical line.
    pub character: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }

    /// Non-strict ordering test: `true` when `self` sits at or before `other`.
    pub fn is_before(&self, other: &Position) -> bool {
        self <= other
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.character.cmp(&other.character))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Which way a command reaches from its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward the start of the buffer.
    Left,
    /// Toward the end of the buffer.
    Right,
}

impl Direction {
    /// The opposite direction.
    pub fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns `true` for [`Direction::Left`].
    pub fn is_left(self) -> bool {
        matches!(self, Self::Left)
    }

    /// Step one line in this direction. Returns `None` when stepping left off line 0.
    pub fn step_line(self, line: usize) -> Option<usize> {
        match self {
            Self::Left => line.checked_sub(1),
            Self::Right => line.checked_add(1),
        }
    }
}

/// A normalized interval between two positions.
///
/// `start` is never after `end`. `reversed` records whether the positions had to be swapped
/// to get there, i.e. whether the original anchor sat after the original head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    /// Textually-earlier endpoint.
    pub start: Position,
    /// Textually-later endpoint.
    pub end: Position,
    /// `true` when the anchor was after the head before normalization.
    pub reversed: bool,
}

impl Range {
    /// Build a range from an anchor and a head, normalizing their order.
    ///
    /// This is the only place orientation is decided.
    pub fn new(anchor: Position, head: Position) -> Self {
        let reversed = !anchor.is_before(&head);
        if reversed {
            Self {
                start: head,
                end: anchor,
                reversed,
            }
        } else {
            Self {
                start: anchor,
                end: head,
                reversed,
            }
        }
    }

    /// Build a range from raw `(line, character)` pairs.
    pub fn from_coords(
        anchor_line: usize,
        anchor_character: usize,
        head_line: usize,
        head_character: usize,
    ) -> Self {
        Self::new(
            Position::new(anchor_line, anchor_character),
            Position::new(head_line, head_character),
        )
    }

    /// A collapsed range (caret) at `pos`.
    pub fn caret(pos: Position) -> Self {
        Self::new(pos, pos)
    }

    /// The fixed end of the range (where a selection was started).
    pub fn anchor(&self) -> Position {
        if self.reversed { self.end } else { self.start }
    }

    /// The moving end of the range (where the caret is drawn).
    pub fn head(&self) -> Position {
        if self.reversed { self.start } else { self.end }
    }

    /// Returns `true` if `start == end`.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Endpoint equality; orientation is ignored.
    pub fn same_span(&self, other: &Range) -> bool {
        self.start == other.start && self.end == other.end
    }

    /// Inclusive containment of a position (touching either endpoint counts).
    pub fn contains_position(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Inclusive containment of both endpoints of `other`.
    pub fn contains_range(&self, other: &Range) -> bool {
        self.contains_position(other.start) && self.contains_position(other.end)
    }

    /// Smallest range covering both `self` and `other`.
    ///
    /// Each endpoint is chosen independently (earliest start, latest end) with line and
    /// character compared as a pair. The result is forward (`reversed == false`).
    pub fn union(&self, other: &Range) -> Range {
        let start = self.start.min(other.start);
        let end = self.end.max(other.end);
        Range::new(start, end)
    }

    /// Copy of this range with the requested orientation.
    pub fn with_reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }
}
