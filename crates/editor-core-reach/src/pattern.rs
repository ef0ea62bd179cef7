//! Pattern compiler.
//!
//! User input comes in two shapes:
//!
//! - a literal token (`//`, `let`, `});`) which is matched verbatim
//! - a delimited regex `/body/flags` (`/\w+/`, `/abc/i`)
//!
//! A literal that itself looks like a delimited regex can be written with escaped delimiters:
//! `\/abc\/i` matches the text `/abc/i`.
//!
//! Supported flags: `i` (case-insensitive), `m` (multi-line anchors), `s` (dot matches
//! newline), plus `g`, `u`, `v`, `d` which are accepted and ignored. Scanning is always global.

use crate::search::{SearchMatch, find_first, find_last};
use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Errors produced while compiling a user pattern.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatternError {
    #[error("invalid regular expression '{pattern}': {source}")]
    /// The regex body failed to compile.
    InvalidRegex {
        /// The user input.
        pattern: String,
        /// The compiler error.
        #[source]
        source: regex::Error,
    },

    #[error("invalid regular expression '{pattern}': unsupported flag '{flag}'")]
    /// The flag suffix contains an unknown or repeated flag.
    UnsupportedFlag {
        /// The user input.
        pattern: String,
        /// The offending flag.
        flag: char,
    },
}

/// A compiled, reusable matcher.
#[derive(Debug, Clone)]
pub struct Pattern {
    // `None` is the never-matching sentinel.
    re: Option<Regex>,
    source: String,
}

impl Pattern {
    /// Compile user input into a matcher.
    pub fn compile(input: &str) -> Result<Self, PatternError> {
        let re = match split_delimited(input) {
            Some((body, flags)) => build_delimited(input, body, flags)?,
            None => {
                let escaped = unwrap_escaped_delimiters(&regex::escape(input));
                Regex::new(&escaped).map_err(|source| PatternError::InvalidRegex {
                    pattern: input.to_string(),
                    source,
                })?
            }
        };

        Ok(Self {
            re: Some(re),
            source: input.to_string(),
        })
    }

    /// A pattern that never matches anything.
    ///
    /// [`RangeExecutor`](crate::RangeExecutor) stops on a compile error. Hosts that drive
    /// [`Resolver`](crate::Resolver) or the `find_*` functions directly can substitute this
    /// instead, so every selection resolves as "not found" and falls back to the buffer edge.
    ///
    /// ```rust
    /// use editor_core_reach::Pattern;
    ///
    /// let pattern = Pattern::compile("/[/").unwrap_or_else(|_| Pattern::never());
    /// assert!(pattern.is_never());
    /// assert!(pattern.first_in("[").is_none());
    /// ```
    pub fn never() -> Self {
        Self {
            re: None,
            source: String::new(),
        }
    }

    /// Returns `true` for the [`Pattern::never`] sentinel.
    pub fn is_never(&self) -> bool {
        self.re.is_none()
    }

    /// The user input this pattern was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// First match in `text` (character offsets).
    pub fn first_in(&self, text: &str) -> Option<SearchMatch> {
        find_first(self.re.as_ref()?, text)
    }

    /// Last non-overlapping match in `text` (character offsets). An empty match at the very
    /// end of `text` does not count.
    pub fn last_in(&self, text: &str) -> Option<SearchMatch> {
        find_last(self.re.as_ref()?, text)
    }

    /// Returns `true` if the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.re.as_ref().is_some_and(|re| re.is_match(text))
    }
}

/// Split `/body/flags`. The body runs to the last slash and must not be empty.
fn split_delimited(input: &str) -> Option<(&str, &str)> {
    let rest = input.strip_prefix('/')?;
    let last = rest.rfind('/')?;
    if last == 0 {
        return None;
    }
    Some((&rest[..last], &rest[last + 1..]))
}

fn build_delimited(input: &str, body: &str, flags: &str) -> Result<Regex, PatternError> {
    let mut builder = RegexBuilder::new(body);
    let mut seen = String::new();

    for flag in flags.chars() {
        if seen.contains(flag) {
            return Err(PatternError::UnsupportedFlag {
                pattern: input.to_string(),
                flag,
            });
        }
        seen.push(flag);

        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'g' | 'u' | 'v' | 'd' => {}
            _ => {
                return Err(PatternError::UnsupportedFlag {
                    pattern: input.to_string(),
                    flag,
                });
            }
        }
    }

    builder.build().map_err(|source| PatternError::InvalidRegex {
        pattern: input.to_string(),
        source,
    })
}

/// After escaping, `\/abc\/i` reads `\\/abc\\/i`. Drop the escaping on the two delimiters so
/// the regex matches the literal text `/abc/i`.
fn unwrap_escaped_delimiters(escaped: &str) -> String {
    const ESCAPED_SLASH: &str = "\\\\/";

    let Some(rest) = escaped.strip_prefix(ESCAPED_SLASH) else {
        return escaped.to_string();
    };
    // Needs a non-empty body before some closing delimiter; the first one found closes.
    if !rest.match_indices(ESCAPED_SLASH).any(|(i, _)| i > 0) {
        return escaped.to_string();
    }
    let Some(close) = rest.find(ESCAPED_SLASH) else {
        return escaped.to_string();
    };

    let mut out = String::with_capacity(escaped.len());
    out.push('/');
    out.push_str(&rest[..close]);
    out.push('/');
    out.push_str(&rest[close + ESCAPED_SLASH.len()..]);
    out
}
