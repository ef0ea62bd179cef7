//! The text buffer seen by the engine.
//!
//! The engine never owns the document: it reads lines and selections through [`TextBuffer`]
//! and submits one atomic batch of edits (or one selection set) at the end of a command.
//! [`RopeBuffer`] is a ready-made implementation backed by `ropey`, used by headless hosts
//! and by the test suite.

use ropey::Rope;

use crate::position::{Position, Range};
use crate::selection::{Selection, TextEdit, ensure_single_primary};

/// Host document interface.
///
/// Lines are split on `\r?\n`; line text never includes the line break.
pub trait TextBuffer {
    /// Number of logical lines (at least 1).
    fn line_count(&self) -> usize;

    /// Text of `line` without its line break, or `None` past the last line.
    fn line_text(&self, line: usize) -> Option<String>;

    /// Text between two positions, line breaks included as stored.
    fn range_text(&self, start: Position, end: Position) -> String;

    /// Current selections in document order.
    fn selections(&self) -> Vec<Selection>;

    /// Apply all edits as one atomic, single-undo-step change.
    ///
    /// Edit ranges are expressed in pre-edit coordinates and never overlap.
    fn apply_edits(&mut self, edits: &[TextEdit]);

    /// Replace the selection set.
    fn set_selections(&mut self, selections: Vec<Selection>);

    /// Width of one indentation step in characters.
    fn indent_unit(&self) -> usize {
        4
    }

    /// `true` while the host editor is in overwrite (insert-key toggled) mode.
    fn is_overwrite_mode(&self) -> bool {
        false
    }
}

/// A `ropey`-backed [`TextBuffer`].
#[derive(Debug, Clone)]
pub struct RopeBuffer {
    rope: Rope,
    selections: Vec<Selection>,
    indent_unit: usize,
    overwrite: bool,
}

impl RopeBuffer {
    /// Build a buffer with a single caret at the start of the document.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selections: vec![Selection::caret(Position::new(0, 0)).primary()],
            indent_unit: 4,
            overwrite: false,
        }
    }

    /// Replace the selection set (builder style).
    pub fn with_selections(mut self, selections: Vec<Selection>) -> Self {
        self.set_selections(selections);
        self
    }

    /// Set the indentation width (builder style).
    pub fn with_indent_unit(mut self, indent_unit: usize) -> Self {
        self.indent_unit = indent_unit.max(1);
        self
    }

    /// Toggle overwrite mode.
    pub fn set_overwrite_mode(&mut self, overwrite: bool) {
        self.overwrite = overwrite;
    }

    /// Complete text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Character length of `line` excluding its line break (0 past the end).
    pub fn line_len(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        line_len_in(&self.rope, line)
    }

    /// Character offset of a position, clamped to the document.
    pub fn position_to_char(&self, pos: Position) -> usize {
        if pos.line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }

        let line_start = self.rope.line_to_char(pos.line);
        line_start + pos.character.min(self.line_len(pos.line))
    }

    /// Position of a character offset, clamped to the document.
    pub fn char_to_position(&self, char_offset: usize) -> Position {
        char_to_position_in(&self.rope, char_offset)
    }
}

impl TextBuffer for RopeBuffer {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }
        Some(text)
    }

    fn range_text(&self, start: Position, end: Position) -> String {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let from = self.position_to_char(start);
        let to = self.position_to_char(end);
        self.rope.slice(from..to).to_string()
    }

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn apply_edits(&mut self, edits: &[TextEdit]) {
        // Resolve every range against the pre-edit text.
        let mut ops: Vec<(usize, usize, &str)> = edits
            .iter()
            .map(|edit| {
                let start = self.position_to_char(edit.range.start);
                let end = self.position_to_char(edit.range.end);
                (start, end, edit.text.as_str())
            })
            .collect();
        ops.sort_by_key(|(start, _, _)| *start);

        let offsets: Vec<(usize, usize)> = self
            .selections
            .iter()
            .map(|selection| {
                (
                    self.position_to_char(selection.range.anchor()),
                    self.position_to_char(selection.range.head()),
                )
            })
            .collect();

        // Back to front so earlier offsets stay valid.
        for &(start, end, text) in ops.iter().rev() {
            if start < end {
                self.rope.remove(start..end);
            }
            if !text.is_empty() {
                self.rope.insert(start, text);
            }
        }

        for (selection, (anchor, head)) in self.selections.iter_mut().zip(offsets) {
            let anchor = char_to_position_in(&self.rope, map_offset(anchor, &ops));
            let head = char_to_position_in(&self.rope, map_offset(head, &ops));
            selection.range = Range::new(anchor, head);
        }
    }

    fn set_selections(&mut self, mut selections: Vec<Selection>) {
        if selections.is_empty() {
            selections.push(Selection::caret(Position::new(0, 0)));
        }
        ensure_single_primary(&mut selections);
        self.selections = selections;
    }

    fn indent_unit(&self) -> usize {
        self.indent_unit
    }

    fn is_overwrite_mode(&self) -> bool {
        self.overwrite
    }
}

/// Map a pre-edit char offset through ascending, non-overlapping ops. Offsets inside a
/// replaced span collapse to its start.
fn map_offset(offset: usize, ops: &[(usize, usize, &str)]) -> usize {
    let mut inserted = 0;
    let mut removed = 0;
    for &(start, end, text) in ops {
        if offset >= end {
            inserted += text.chars().count();
            removed += end - start;
        } else if offset > start {
            return start + inserted - removed;
        } else {
            break;
        }
    }
    offset + inserted - removed
}

fn char_to_position_in(rope: &Rope, char_offset: usize) -> Position {
    let char_offset = char_offset.min(rope.len_chars());
    let line = rope.char_to_line(char_offset);
    let character = char_offset - rope.line_to_char(line);
    Position::new(line, character.min(line_len_in(rope, line)))
}

fn line_len_in(rope: &Rope, line: usize) -> usize {
    let slice = rope.line(line);
    let mut len = slice.len_chars();
    if len > 0 && slice.char(len - 1) == '\n' {
        len -= 1;
        if len > 0 && slice.char(len - 1) == '\r' {
            len -= 1;
        }
    }
    len
}
