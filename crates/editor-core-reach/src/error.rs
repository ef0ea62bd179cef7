//! Error types.

use thiserror::Error;

use crate::executor::NoticeLevel;
use crate::pattern::PatternError;

#[derive(Debug, Error)]
/// Errors that abort a command execution. The buffer is never touched when one is returned.
pub enum ReachError {
    #[error(transparent)]
    /// The user pattern failed to compile.
    InvalidPattern(#[from] PatternError),

    #[error("execution cancelled")]
    /// A prompt was dismissed.
    Cancelled,

    #[error("invalid options: {0}")]
    /// Options could not be parsed.
    Config(#[from] toml::de::Error),

    #[error("cannot serialize options: {0}")]
    /// Options could not be written out.
    ConfigSerialize(#[from] toml::ser::Error),
}

impl ReachError {
    /// Returns `true` for [`ReachError::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Display level: a cancellation is a warning, everything else an error.
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::Cancelled => NoticeLevel::Warning,
            _ => NoticeLevel::Error,
        }
    }
}
