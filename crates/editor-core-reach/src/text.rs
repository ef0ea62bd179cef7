//! Line and whitespace helpers. All offsets are character offsets.

pub(crate) fn split_lines_preserve_trailing(text: &str) -> Vec<&str> {
    // `str::split('\n')` preserves trailing empty segments, which matches editor line
    // semantics (N newlines => N+1 lines).
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Substring by character offsets, clamped to the text.
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start_byte = char_to_byte(text, start);
    let end_byte = char_to_byte(text, end.max(start));
    &text[start_byte..end_byte]
}

pub(crate) fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

/// `true` if `text` is empty or only whitespace.
pub(crate) fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// Offset of the first non-whitespace character, `0` for blank lines.
pub(crate) fn first_non_whitespace(text: &str) -> usize {
    text.chars().position(|c| !c.is_whitespace()).unwrap_or(0)
}

/// Offset where trailing whitespace begins (line length if there is none).
pub(crate) fn trailing_whitespace_start(text: &str) -> usize {
    let trailing = text.chars().rev().take_while(|c| c.is_whitespace()).count();
    char_len(text) - trailing
}

/// Every character except line breaks and tabs becomes a space.
pub(crate) fn blank_out(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => c,
            _ => ' ',
        })
        .collect()
}
