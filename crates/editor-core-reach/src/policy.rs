//! Policy collaborator.
//!
//! Every decision the engine cannot make on its own goes through a [`Prompter`]. Each call
//! is a suspension point: the executor blocks on it, and a `None` answer cancels the whole
//! execution with nothing committed.
//!
//! [`ExecutionContext`] holds the per-execution state around those calls: memoized
//! "ask once per execution" answers and the sticky cancellation flag.

use crate::options::{NotFoundPolicy, SpacePolicy};
use crate::position::{Direction, Range};
use crate::selection::{Selection, SelectionDirection};

/// Answer to "the pattern was not found".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundAnswer {
    /// Reach to the line (or buffer) edge anyway.
    ProcessEverything,
    /// Leave the selection alone.
    SkipSelection,
}

/// Context for [`Prompter::ask_for_pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRequest {
    /// Select-to rather than delete-to.
    pub select: bool,
    /// Direction of the command.
    pub direction: Direction,
    /// Multiline variant.
    pub multiline: bool,
}

/// Context for [`Prompter::ask_not_found`].
#[derive(Debug, Clone, Copy)]
pub struct NotFoundRequest<'a> {
    /// The selection being asked about, or every unmatched selection of the batch.
    pub selections: &'a [Selection],
    /// `true` when the answer only applies to `selections[0]`.
    pub per_selection: bool,
    /// Multiline variant.
    pub multiline: bool,
    /// Select-to rather than delete-to.
    pub select: bool,
    /// Direction of the command.
    pub direction: Direction,
    /// The pattern as typed.
    pub pattern: &'a str,
}

/// Context for [`Prompter::ask_space_replacement`].
#[derive(Debug, Clone, Copy)]
pub struct SpaceRequest<'a> {
    /// The range being asked about, or every candidate range of the batch.
    pub ranges: &'a [Range],
    /// `true` when the answer only applies to `ranges[0]`.
    pub per_selection: bool,
    /// The pattern as typed.
    pub pattern: &'a str,
}

/// Context for [`Prompter::ask_selection_direction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionRequest {
    /// Number of selections.
    pub count: usize,
    /// All selections currently share one direction.
    pub all_same: bool,
    /// At least one selection is right-to-left.
    pub any_reversed: bool,
}

/// Host-side UI. `None` always means the user dismissed the prompt.
pub trait Prompter {
    /// Ask for the pattern of a to-pattern command. An empty string means "to the edge".
    fn ask_for_pattern(&mut self, request: &PatternRequest) -> Option<String>;

    /// Ask whether the match itself is part of the edit.
    fn ask_include_match(&mut self, pattern: &str) -> Option<bool>;

    /// Ask what to do with selections whose pattern was not found.
    fn ask_not_found(&mut self, request: &NotFoundRequest<'_>) -> Option<NotFoundAnswer>;

    /// Ask whether overwrite-mode ranges at line end become spaces.
    fn ask_space_replacement(&mut self, request: &SpaceRequest<'_>) -> Option<bool>;

    /// Ask for the new direction of every selection.
    fn ask_selection_direction(&mut self, request: &DirectionRequest)
    -> Option<SelectionDirection>;

    /// Called with the pattern a to-pattern command used, so the host can offer it again.
    fn remember_pattern(&mut self, _pattern: &str) {}
}

/// Per-execution policy state. Created fresh for every command.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    not_found_answer: Option<NotFoundAnswer>,
    space_answer: Option<bool>,
    cancelled: bool,
}

impl ExecutionContext {
    /// Create a fresh context.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once any prompt was dismissed (or the pattern was invalid).
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Mark the execution as cancelled. Sticky.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Resolve the not-found policy for one unmatched selection.
    ///
    /// `request.selections` must hold every unmatched selection of the batch; the per-selection
    /// prompt narrows it to `current`. Returns `true` to skip. On cancellation the context is
    /// marked cancelled and `false` is returned.
    pub fn should_skip<P: Prompter + ?Sized>(
        &mut self,
        prompter: &mut P,
        policy: NotFoundPolicy,
        current: &Selection,
        request: &NotFoundRequest<'_>,
    ) -> bool {
        let answer = match policy {
            NotFoundPolicy::ProcessEverything => Some(NotFoundAnswer::ProcessEverything),
            NotFoundPolicy::SkipSelection => Some(NotFoundAnswer::SkipSelection),
            NotFoundPolicy::AskPerSelection => prompter.ask_not_found(&NotFoundRequest {
                selections: std::slice::from_ref(current),
                per_selection: true,
                ..*request
            }),
            NotFoundPolicy::AskPerExecution => match self.not_found_answer {
                Some(answer) => Some(answer),
                None => {
                    let answer = prompter.ask_not_found(&NotFoundRequest {
                        per_selection: false,
                        ..*request
                    });
                    self.not_found_answer = answer;
                    answer
                }
            },
        };

        match answer {
            Some(answer) => answer == NotFoundAnswer::SkipSelection,
            None => {
                tracing::debug!("not-found prompt dismissed");
                self.cancel();
                false
            }
        }
    }

    /// Resolve the overwrite-mode space policy for one range without content after it.
    ///
    /// Plain commands (`pattern == None`) always space-fill. On cancellation the context is
    /// marked cancelled and `false` is returned.
    pub fn should_replace_with_spaces<P: Prompter + ?Sized>(
        &mut self,
        prompter: &mut P,
        policy: SpacePolicy,
        current: &Range,
        candidates: &[Range],
        pattern: Option<&str>,
    ) -> bool {
        let Some(pattern) = pattern else {
            return true;
        };

        let answer = match policy {
            SpacePolicy::Yes => Some(true),
            SpacePolicy::No => Some(false),
            SpacePolicy::AskPerSelection => prompter.ask_space_replacement(&SpaceRequest {
                ranges: std::slice::from_ref(current),
                per_selection: true,
                pattern,
            }),
            SpacePolicy::AskPerExecution => match self.space_answer {
                Some(answer) => Some(answer),
                None => {
                    let answer = prompter.ask_space_replacement(&SpaceRequest {
                        ranges: candidates,
                        per_selection: false,
                        pattern,
                    });
                    self.space_answer = answer;
                    answer
                }
            },
        };

        answer.unwrap_or_else(|| {
            tracing::debug!("space replacement prompt dismissed");
            self.cancel();
            false
        })
    }
}
