//! Cross-line resolution: edge hand-off for plain commands and multiline to-pattern.

use crate::buffer::TextBuffer;
use crate::edge::{Resolution, Resolver, anchor_of, everything_left_char, string_index};
use crate::options::SearchMode;
use crate::pattern::Pattern;
use crate::position::{Direction, Position};
use crate::selection::Selection;
use crate::text::{
    char_len, char_slice, is_blank, split_lines_preserve_trailing, trailing_whitespace_start,
};

/// The line a plain command lands on after leaving its own line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HandOff {
    line: usize,
    text: String,
    /// At least one blank line was stepped over (or, without collection, the line is blank).
    blank: bool,
}

impl<B: TextBuffer + ?Sized> Resolver<'_, B> {
    /// `true` if every selection of the batch sits on the edge `direction` reaches toward.
    ///
    /// Right: nothing but whitespace after each selection end.
    /// Left: each start inside non-empty leading indentation (with `move-on-indent`), or
    /// otherwise each start at column 0.
    pub fn batch_at_edge(&self, selections: &[Selection], direction: Direction) -> bool {
        let text_of = |line: usize| self.buffer.line_text(line).unwrap_or_default();

        match direction {
            Direction::Right => selections.iter().all(|selection| {
                let end = selection.end();
                let text = text_of(end.line);
                is_blank(char_slice(&text, end.character, char_len(&text)))
            }),
            Direction::Left => {
                let all_in_indent = self.options.move_on_indent
                    && selections.iter().all(|selection| {
                        let start = selection.start();
                        let before = char_slice(&text_of(start.line), 0, start.character)
                            .to_string();
                        !before.is_empty() && is_blank(&before)
                    });

                all_in_indent
                    || selections
                        .iter()
                        .all(|selection| selection.start().character == 0)
            }
        }
    }

    fn hand_off(&self, line: usize, direction: Direction) -> Option<HandOff> {
        let line = direction.step_line(line)?;
        let text = self.buffer.line_text(line)?;

        if !self.options.collect_empty_lines {
            let blank = is_blank(&text);
            return Some(HandOff { line, text, blank });
        }

        // Walk over the blank run and stop on its last line.
        let mut found = HandOff {
            line,
            text,
            blank: false,
        };
        let mut next = Some(line);
        while let Some(current) = next {
            let Some(text) = self.buffer.line_text(current) else {
                break;
            };
            if !is_blank(&text) {
                break;
            }
            found = HandOff {
                line: current,
                text,
                blank: true,
            };
            next = direction.step_line(current);
        }

        Some(found)
    }

    /// Destination on the adjacent line once a plain command leaves its own line.
    pub(crate) fn resolve_hand_off(&self, line: usize, direction: Direction) -> Resolution {
        let Some(HandOff { line, text, blank }) = self.hand_off(line, direction) else {
            return Resolution::unresolved();
        };
        let len = char_len(&text);
        let preserve = self.options.preserve_line_spaces(direction);

        let character = match direction {
            // Landed on the next line: reach into its indentation.
            Direction::Right if blank => len,
            Direction::Right if !self.select && preserve => 0,
            Direction::Right => everything_left_char(&text, len, self.indent_rule(direction)),
            // Landed on the previous line: reach back to its content end.
            Direction::Left if self.select => trailing_whitespace_start(&text),
            Direction::Left if preserve => len,
            Direction::Left => match trailing_whitespace_start(&text) {
                0 => len,
                content_end => content_end,
            },
        };

        Resolution::at(Position::new(line, character))
    }

    /// Multiline to-pattern.
    ///
    /// `pattern == None` resolves straight to the buffer edge without asking for the
    /// not-found policy.
    pub fn resolve_multiline(
        &self,
        selection: &Selection,
        pattern: Option<&Pattern>,
        include: bool,
        direction: Direction,
    ) -> Resolution {
        let anchor = anchor_of(selection, direction);

        if let Some(pattern) = pattern {
            let found = match self.options.search_mode {
                SearchMode::LineByLine => {
                    find_line_by_line(self.buffer, anchor, pattern, include, direction)
                }
                SearchMode::InBlock => {
                    find_in_block(self.buffer, anchor, pattern, include, direction)
                }
            };
            if let Some(destination) = found {
                return Resolution::at(destination);
            }
        }

        let fallback = buffer_edge(self.buffer, direction);
        if pattern.is_some() {
            Resolution::not_found(fallback)
        } else {
            Resolution::at(fallback)
        }
    }
}

/// `(0, 0)` for left, the end of the last line for right.
pub fn buffer_edge<B: TextBuffer + ?Sized>(buffer: &B, direction: Direction) -> Position {
    match direction {
        Direction::Left => Position::new(0, 0),
        Direction::Right => {
            let last = buffer.line_count().saturating_sub(1);
            let len = buffer
                .line_text(last)
                .map(|text| char_len(&text))
                .unwrap_or(0);
            Position::new(last, len)
        }
    }
}

/// Scan one line at a time. Only the anchor's own line is restricted to the part beyond
/// the anchor; every following line is searched whole.
pub fn find_line_by_line<B: TextBuffer + ?Sized>(
    buffer: &B,
    anchor: Position,
    pattern: &Pattern,
    include: bool,
    direction: Direction,
) -> Option<Position> {
    let mut line = anchor.line;
    let mut search_from = Some(anchor.character);

    loop {
        let text = buffer.line_text(line)?;
        if let Some(character) = string_index(&text, pattern, search_from, include, direction) {
            return Some(Position::new(line, character));
        }
        line = direction.step_line(line)?;
        search_from = None;
    }
}

/// Scan the whole text between the anchor and the buffer edge as a single string, so
/// matches may span line breaks.
pub fn find_in_block<B: TextBuffer + ?Sized>(
    buffer: &B,
    anchor: Position,
    pattern: &Pattern,
    include: bool,
    direction: Direction,
) -> Option<Position> {
    match direction {
        Direction::Left => {
            let block = buffer.range_text(Position::new(0, 0), anchor);
            let found = pattern.last_in(&block)?;
            let cut = if include { found.start } else { found.end };

            let lines = split_lines_preserve_trailing(char_slice(&block, 0, cut));
            let line = lines.len() - 1;
            let character = lines.last().map(|text| char_len(text)).unwrap_or(0);
            Some(Position::new(line, character))
        }
        Direction::Right => {
            let block = buffer.range_text(anchor, buffer_edge(buffer, Direction::Right));
            let found = pattern.first_in(&block)?;
            let cut = if include { found.end } else { found.start };

            let lines = split_lines_preserve_trailing(char_slice(&block, 0, cut));
            let mut character = lines.last().map(|text| char_len(text)).unwrap_or(0);
            if lines.len() == 1 {
                character += anchor.character;
            }
            Some(Position::new(anchor.line + lines.len() - 1, character))
        }
    }
}
