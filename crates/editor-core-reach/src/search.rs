//! Character-offset regex scanning.
//!
//! The `regex` crate reports byte offsets; everything above this module speaks characters.
//! Unlike find-and-replace search, empty matches are kept: patterns such as `$` are
//! legitimate destinations for a select-to / delete-to command.

use regex::Regex;

/// A match expressed as a half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl SearchMatch {
    /// Returns the length of the match in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

#[derive(Debug)]
struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) => idx,
            Err(idx) => idx,
        }
    }

    fn to_match(&self, m: regex::Match<'_>) -> SearchMatch {
        SearchMatch {
            start: self.byte_to_char(m.start()),
            end: self.byte_to_char(m.end()),
        }
    }
}

/// First match of `re` in `text`.
pub(crate) fn find_first(re: &Regex, text: &str) -> Option<SearchMatch> {
    let index = CharIndex::new(text);
    re.find(text).map(|m| index.to_match(m))
}

/// Last non-overlapping match of `re` in `text`, scanning left to right.
///
/// `text` is the part of a line before a cursor, so an empty match sitting right at its end
/// is the cursor itself; the match before it is taken instead.
pub(crate) fn find_last(re: &Regex, text: &str) -> Option<SearchMatch> {
    let index = CharIndex::new(text);
    let mut last = None;
    let mut previous = None;
    for m in re.find_iter(text) {
        previous = last.replace(m);
    }

    match last {
        Some(m) if m.is_empty() && m.start() == text.len() => previous,
        other => other,
    }
    .map(|m| index.to_match(m))
}
