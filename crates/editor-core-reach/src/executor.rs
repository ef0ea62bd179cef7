//! Command orchestration.
//!
//! [`RangeExecutor`] runs one command against a [`TextBuffer`]:
//!
//! 1. ask for the pattern (to-pattern commands only) and compile it
//! 2. resolve a destination for every selection (pure, see [`Resolver`])
//! 3. drop empty reaches and consult the not-found policy for unmatched selections
//! 4. merge overlapping ranges
//! 5. space-fill in overwrite mode, then submit one atomic edit (or selection set)
//!
//! Any dismissed prompt aborts the command before step 5 with nothing committed.

use std::fmt;

use crate::buffer::TextBuffer;
use crate::edge::{Resolution, Resolver, fixed_end_of};
use crate::error::ReachError;
use crate::merge::merge_ranges;
use crate::options::Options;
use crate::pattern::Pattern;
use crate::policy::{DirectionRequest, ExecutionContext, NotFoundRequest, PatternRequest, Prompter};
use crate::position::{Direction, Position, Range};
use crate::selection::{EditRange, Selection, TextEdit};
use crate::text::{blank_out, char_len, char_slice, is_blank};

/// Commands understood by [`RangeExecutor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Delete to the line edge (handing off to the adjacent line at the edge).
    Delete(Direction),
    /// Delete up to a prompted pattern.
    DeleteToPattern {
        /// Direction of the reach.
        direction: Direction,
        /// Search past the anchor's line.
        multiline: bool,
    },
    /// Extend each selection to the line edge.
    Select(Direction),
    /// Extend each selection up to a prompted pattern.
    SelectToPattern {
        /// Direction of the reach.
        direction: Direction,
        /// Search past the anchor's line.
        multiline: bool,
    },
    /// Set the direction of every selection.
    ChangeSelectionDirection,
    /// Shrink every selection past surrounding whitespace.
    TrimSelection,
}

/// How prominently the host should show a [`Notice`] or a [`ReachError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoticeLevel {
    /// Plain feedback.
    Info,
    /// The command did not run to completion.
    Warning,
    /// The user input was rejected.
    Error,
}

/// Informational feedback for the host to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Overlapping ranges were folded together.
    SelectionsMerged(usize),
    /// Unmatched selections were left alone by the not-found policy.
    SelectionsSkipped(usize),
    /// A delete command produced no edit.
    NothingDeleted,
    /// A selection command left every selection as it was.
    NoSelectionChanged,
}

impl Notice {
    /// Display level. Every notice is informational.
    pub fn level(&self) -> NoticeLevel {
        NoticeLevel::Info
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |count: usize| if count > 1 { "s" } else { "" };
        match self {
            Notice::SelectionsMerged(count) => {
                write!(f, "{count} selection{} merged", plural(*count))
            }
            Notice::SelectionsSkipped(count) => {
                write!(f, "{count} selection{} skipped", plural(*count))
            }
            Notice::NothingDeleted => write!(f, "nothing was deleted"),
            Notice::NoSelectionChanged => write!(f, "no selection changed"),
        }
    }
}

/// What a successful execution did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Feedback in the order it was raised.
    pub notices: Vec<Notice>,
    /// Number of text edits submitted.
    pub edits: usize,
    /// Number of selections written back.
    pub selections: usize,
    /// Ranges folded away by merging.
    pub merged: usize,
    /// Selections skipped by the not-found policy.
    pub skipped: usize,
}

impl ExecutionReport {
    /// Returns `true` if `notice` was raised.
    pub fn has_notice(&self, notice: Notice) -> bool {
        self.notices.contains(&notice)
    }
}

/// Where a reach command stops.
#[derive(Debug, Clone, Copy)]
enum Target<'p> {
    Edge,
    Pattern {
        pattern: Option<&'p Pattern>,
        include: bool,
        multiline: bool,
    },
}

/// A resolved, non-empty reach for one selection.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    selection: Selection,
    range: Range,
    verify: bool,
}

/// Runs commands against a buffer, consulting a [`Prompter`] for decisions.
///
/// # Example
///
/// ```rust
/// use editor_core_reach::{
///     Command, DirectionRequest, Direction, NotFoundAnswer, NotFoundRequest, Options,
///     PatternRequest, Position, Prompter, RangeExecutor, RopeBuffer, Selection,
///     SelectionDirection, SpaceRequest,
/// };
///
/// struct Fixed;
///
/// impl Prompter for Fixed {
///     fn ask_for_pattern(&mut self, _: &PatternRequest) -> Option<String> {
///         Some(",".to_string())
///     }
///     fn ask_include_match(&mut self, _: &str) -> Option<bool> {
///         Some(true)
///     }
///     fn ask_not_found(&mut self, _: &NotFoundRequest<'_>) -> Option<NotFoundAnswer> {
///         Some(NotFoundAnswer::SkipSelection)
///     }
///     fn ask_space_replacement(&mut self, _: &SpaceRequest<'_>) -> Option<bool> {
///         Some(false)
///     }
///     fn ask_selection_direction(&mut self, _: &DirectionRequest) -> Option<SelectionDirection> {
///         None
///     }
/// }
///
/// let mut buffer = RopeBuffer::new("foo, bar")
///     .with_selections(vec![Selection::caret(Position::new(0, 0))]);
/// let mut executor = RangeExecutor::new(Options::default(), Fixed);
///
/// executor
///     .execute(
///         Some(&mut buffer),
///         Command::DeleteToPattern { direction: Direction::Right, multiline: false },
///     )
///     .unwrap();
/// assert_eq!(buffer.text(), " bar");
/// ```
#[derive(Debug)]
pub struct RangeExecutor<P> {
    options: Options,
    prompter: P,
}

impl<P: Prompter> RangeExecutor<P> {
    /// Create an executor.
    pub fn new(options: Options, prompter: P) -> Self {
        Self { options, prompter }
    }

    /// Current options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace the options used by later executions.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    /// The prompter.
    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    /// The prompter (mutable).
    pub fn prompter_mut(&mut self) -> &mut P {
        &mut self.prompter
    }

    /// Run `command`. Without an active buffer this is a no-op.
    pub fn execute<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: Option<&mut B>,
        command: Command,
    ) -> Result<ExecutionReport, ReachError> {
        let Some(buffer) = buffer else {
            tracing::debug!(?command, "no active buffer");
            return Ok(ExecutionReport::default());
        };

        match command {
            Command::Delete(direction) => self.reach(buffer, false, direction, None),
            Command::Select(direction) => self.reach(buffer, true, direction, None),
            Command::DeleteToPattern {
                direction,
                multiline,
            } => self.reach(buffer, false, direction, Some(multiline)),
            Command::SelectToPattern {
                direction,
                multiline,
            } => self.reach(buffer, true, direction, Some(multiline)),
            Command::ChangeSelectionDirection => self.change_direction(buffer),
            Command::TrimSelection => self.trim(buffer),
        }
    }

    /// Delete everything left of each caret.
    pub fn delete_left<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: Option<&mut B>,
    ) -> Result<ExecutionReport, ReachError> {
        self.execute(buffer, Command::Delete(Direction::Left))
    }

    /// Delete everything right of each caret.
    pub fn delete_right<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: Option<&mut B>,
    ) -> Result<ExecutionReport, ReachError> {
        self.execute(buffer, Command::Delete(Direction::Right))
    }

    /// Delete left up to a prompted pattern on the same line.
    pub fn delete_to_pattern_left<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: Option<&mut B>,
    ) -> Result<ExecutionReport, ReachError> {
        self.execute(buffer, to_pattern(false, Direction::Left, false))
    }

    /// Delete right up to a prompted pattern on the same line.
    pub fn delete_to_pattern_right<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: Option<&mut B>,
    ) -> Result<ExecutionReport, ReachError> {
        self.execute(buffer, to_pattern(false, Direction::Right, false))
    }

    /// Delete left up to a prompted pattern, searching previous lines.
    pub fn delete_to_pattern_left_multiline<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: Option<&mut B>,
    ) -> Result<ExecutionReport, ReachError> {
        self.execute(buffer, to_pattern(false, Direction::Left, true))
    }

    /// Delete right up to a prompted pattern, searching following lines.
    pub fn delete_to_pattern_right_multiline<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: Option<&mut B>,
    ) -> Result<ExecutionReport, ReachError> {
        self.execute(buffer, to_pattern(false, Direction::Right, true))
    }

    /// Extend each selection to the left edge.
    pub fn select_left<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: Option<&mut B>,
    ) -> Result<ExecutionReport, ReachError> {
        self.execute(buffer, Command::Select(Direction::Left))
    }

    /// Extend each selection to the right edge.
    pub fn select_right<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: Option<&mut B>,
    ) -> Result<ExecutionReport, ReachError> {
        self.execute(buffer, Command::Select(Direction::Right))
    }

    /// Extend each selection left up to a prompted pattern on the same line.
    pub fn select_to_pattern_left<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: Option<&mut B>,
    ) -> Result<ExecutionReport, ReachError> {
        self.execute(buffer, to_pattern(true, Direction::Left, false))
    }

    /// Extend each selection right up to a prompted pattern on the same line.
    pub fn select_to_pattern_right<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: Option<&mut B>,
    ) -> Result<ExecutionReport, ReachError> {
        self.execute(buffer, to_pattern(true, Direction::Right, false))
    }

    /// Extend each selection left up to a prompted pattern, searching previous lines.
    pub fn select_to_pattern_left_multiline<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: Option<&mut B>,
    ) -> Result<ExecutionReport, ReachError> {
        self.execute(buffer, to_pattern(true, Direction::Left, true))
    }

    /// Extend each selection right up to a prompted pattern, searching following lines.
    pub fn select_to_pattern_right_multiline<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: Option<&mut B>,
    ) -> Result<ExecutionReport, ReachError> {
        self.execute(buffer, to_pattern(true, Direction::Right, true))
    }

    /// Set the direction of every selection.
    pub fn change_selection_direction<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: Option<&mut B>,
    ) -> Result<ExecutionReport, ReachError> {
        self.execute(buffer, Command::ChangeSelectionDirection)
    }

    /// Shrink every selection past surrounding whitespace.
    pub fn trim_selection<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: Option<&mut B>,
    ) -> Result<ExecutionReport, ReachError> {
        self.execute(buffer, Command::TrimSelection)
    }

    /// Delete/select to the edge (`multiline == None`) or to a prompted pattern.
    fn reach<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        select: bool,
        direction: Direction,
        multiline: Option<bool>,
    ) -> Result<ExecutionReport, ReachError> {
        let Some(multiline) = multiline else {
            return self.run_reach(buffer, select, direction, Target::Edge, None);
        };

        let request = PatternRequest {
            select,
            direction,
            multiline,
        };
        let Some(input) = self.prompter.ask_for_pattern(&request) else {
            tracing::warn!("pattern prompt dismissed");
            return Err(ReachError::Cancelled);
        };

        let include = if input.is_empty() {
            false
        } else {
            let Some(include) = self.prompter.ask_include_match(&input) else {
                tracing::warn!("include prompt dismissed");
                self.prompter.remember_pattern(&input);
                return Err(ReachError::Cancelled);
            };
            include
        };

        let pattern = if input.is_empty() {
            None
        } else {
            match Pattern::compile(&input) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    tracing::warn!(%err, "invalid pattern");
                    self.prompter.remember_pattern(&input);
                    return Err(err.into());
                }
            }
        };

        let target = Target::Pattern {
            pattern: pattern.as_ref(),
            include,
            multiline,
        };
        let result = self.run_reach(buffer, select, direction, target, Some(&input));
        self.prompter.remember_pattern(&input);
        result
    }

    fn run_reach<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        select: bool,
        direction: Direction,
        target: Target<'_>,
        input: Option<&str>,
    ) -> Result<ExecutionReport, ReachError> {
        let Self { options, prompter } = self;
        let mut context = ExecutionContext::new();
        let mut report = ExecutionReport::default();

        let selections = buffer.selections();
        let candidates = resolve_candidates(&*buffer, options, &selections, select, direction, target);
        tracing::debug!(
            select,
            ?direction,
            selections = selections.len(),
            candidates = candidates.len(),
            "resolved batch"
        );

        // Policy pass, in document order.
        let unmatched: Vec<Selection> = candidates
            .iter()
            .filter(|candidate| candidate.verify)
            .map(|candidate| candidate.selection)
            .collect();
        let multiline = matches!(target, Target::Pattern { multiline: true, .. });
        let policy = options.not_found_policy(multiline);
        let request = NotFoundRequest {
            selections: &unmatched,
            per_selection: false,
            multiline,
            select,
            direction,
            pattern: input.unwrap_or_default(),
        };

        let mut ranges: Vec<EditRange> = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            let skip = candidate.verify
                && context.should_skip(&mut *prompter, policy, &candidate.selection, &request);
            if context.is_cancelled() {
                tracing::warn!("execution cancelled");
                return Err(ReachError::Cancelled);
            }

            if !skip {
                let mut edit = EditRange::new(candidate.range);
                edit.no_change = select && candidate.range.same_span(&candidate.selection.range);
                ranges.push(edit);
            } else {
                report.skipped += 1;
                if select {
                    ranges.push(EditRange::unchanged(candidate.selection.range));
                }
            }
        }

        if report.skipped > 0 {
            report.notices.push(Notice::SelectionsSkipped(report.skipped));
        }

        if ranges.is_empty() {
            report.notices.push(if select {
                Notice::NoSelectionChanged
            } else {
                Notice::NothingDeleted
            });
            return Ok(report);
        }

        let nothing_changed = ranges.iter().all(|range| range.no_change);
        let (mut merged, absorbed) = merge_ranges(ranges, direction);
        report.merged = absorbed;

        if select {
            let selections: Vec<Selection> = merged
                .iter()
                .map(|edit| Selection::from_range(edit.range))
                .collect();
            report.selections = selections.len();
            buffer.set_selections(selections);
        } else {
            let overwrite = buffer.is_overwrite_mode();
            if overwrite {
                fill_with_spaces(&*buffer, options, &mut *prompter, &mut context, &mut merged, input)?;
            }

            let edits: Vec<TextEdit> = merged.iter().map(EditRange::to_text_edit).collect();
            report.edits = edits.len();
            buffer.apply_edits(&edits);

            if overwrite {
                let carets = carets_after_edits(&edits);
                report.selections = carets.len();
                buffer.set_selections(carets);
            }
        }

        if absorbed > 0 {
            report.notices.push(Notice::SelectionsMerged(absorbed));
        }
        if select && nothing_changed {
            report.notices.push(Notice::NoSelectionChanged);
        }

        Ok(report)
    }

    fn change_direction<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
    ) -> Result<ExecutionReport, ReachError> {
        let mut selections = buffer.selections();
        let reversed = selections.iter().filter(|s| s.range.reversed).count();
        let all_same = reversed == 0 || reversed == selections.len();
        let mut report = ExecutionReport::default();

        let to_reversed = if all_same && self.options.auto_flip_direction {
            reversed == 0
        } else {
            let request = DirectionRequest {
                count: selections.len(),
                all_same,
                any_reversed: reversed > 0,
            };
            let Some(choice) = self.prompter.ask_selection_direction(&request) else {
                tracing::warn!("direction prompt dismissed");
                return Err(ReachError::Cancelled);
            };
            if all_same && choice.is_reversed() == (reversed > 0) {
                report.notices.push(Notice::NoSelectionChanged);
                return Ok(report);
            }
            choice.is_reversed()
        };

        for selection in &mut selections {
            selection.range = selection.range.with_reversed(to_reversed);
        }
        report.selections = selections.len();
        buffer.set_selections(selections);
        Ok(report)
    }

    fn trim<B: TextBuffer + ?Sized>(&mut self, buffer: &mut B) -> Result<ExecutionReport, ReachError> {
        let mut selections = buffer.selections();
        let mut changed = 0;

        for selection in &mut selections {
            let text = buffer.range_text(selection.start(), selection.end());
            let Some((start, end)) = content_bounds(selection.start(), &text) else {
                continue;
            };
            if start != selection.start() || end != selection.end() {
                selection.range = Range {
                    start,
                    end,
                    reversed: selection.range.reversed,
                };
                changed += 1;
            }
        }

        let mut report = ExecutionReport::default();
        if changed == 0 {
            report.notices.push(Notice::NoSelectionChanged);
            return Ok(report);
        }

        tracing::debug!(changed, "trimmed selections");
        report.selections = selections.len();
        buffer.set_selections(selections);
        Ok(report)
    }
}

fn to_pattern(select: bool, direction: Direction, multiline: bool) -> Command {
    if select {
        Command::SelectToPattern {
            direction,
            multiline,
        }
    } else {
        Command::DeleteToPattern {
            direction,
            multiline,
        }
    }
}

fn resolve_candidates<B: TextBuffer + ?Sized>(
    buffer: &B,
    options: &Options,
    selections: &[Selection],
    select: bool,
    direction: Direction,
    target: Target<'_>,
) -> Vec<Candidate> {
    let resolver = Resolver::new(buffer, options, select);
    let batch_at_edge = matches!(target, Target::Edge) && resolver.batch_at_edge(selections, direction);

    selections
        .iter()
        .filter_map(|selection| {
            let resolution: Resolution = match target {
                Target::Edge => resolver.resolve_plain(selection, direction, batch_at_edge),
                Target::Pattern {
                    pattern,
                    include,
                    multiline: false,
                } => resolver.resolve_to_pattern(selection, pattern, include, direction),
                Target::Pattern {
                    pattern,
                    include,
                    multiline: true,
                } => resolver.resolve_multiline(selection, pattern, include, direction),
            };
            tracing::trace!(?selection, ?resolution, "resolved selection");

            let from = fixed_end_of(selection, direction);
            let destination = resolution.destination.filter(|destination| *destination != from)?;
            Some(Candidate {
                selection: *selection,
                range: Range::new(from, destination),
                verify: resolution.verify_selection,
            })
        })
        .collect()
}

/// Overwrite mode: turn deletions into space fills. Ranges followed by content on their end
/// line are always filled; the rest follow the space policy.
fn fill_with_spaces<B: TextBuffer + ?Sized, P: Prompter + ?Sized>(
    buffer: &B,
    options: &Options,
    prompter: &mut P,
    context: &mut ExecutionContext,
    ranges: &mut [EditRange],
    input: Option<&str>,
) -> Result<(), ReachError> {
    let at_line_end: Vec<bool> = ranges
        .iter()
        .map(|edit| {
            let line = buffer.line_text(edit.range.end.line).unwrap_or_default();
            is_blank(char_slice(&line, edit.range.end.character, char_len(&line)))
        })
        .collect();
    let candidates: Vec<Range> = ranges
        .iter()
        .zip(&at_line_end)
        .filter(|(_, at_end)| **at_end)
        .map(|(edit, _)| edit.range)
        .collect();

    for (edit, at_end) in ranges.iter_mut().zip(at_line_end) {
        let replace = !at_end
            || context.should_replace_with_spaces(
                prompter,
                options.replace_with_spaces,
                &edit.range,
                &candidates,
                input,
            );
        if context.is_cancelled() {
            tracing::warn!("execution cancelled");
            return Err(ReachError::Cancelled);
        }

        edit.text = if replace {
            blank_out(&buffer.range_text(edit.range.start, edit.range.end))
        } else {
            String::new()
        };
    }

    Ok(())
}

/// One caret at the start of every edit, in post-edit coordinates. Deleted spans may remove
/// line breaks, which moves every later edit up and (on the joined line) sideways.
fn carets_after_edits(edits: &[TextEdit]) -> Vec<Selection> {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|edit| edit.range.start);

    // Shift applied to positions after the previous edit: lines, and characters on the line
    // the previous edit ended on.
    let mut line_delta: isize = 0;
    let mut joined: Option<(usize, isize)> = None;

    sorted
        .into_iter()
        .map(|edit| {
            let Range { start, end, .. } = edit.range;
            let column_delta = match joined {
                Some((line, delta)) if line == start.line => delta,
                _ => 0,
            };
            let caret = Position::new(
                start.line.saturating_add_signed(line_delta),
                start.character.saturating_add_signed(column_delta),
            );

            let breaks = edit.text.matches('\n').count();
            let tail = edit.text.rsplit('\n').next().map(char_len).unwrap_or(0);
            let (end_line, end_character) = if breaks == 0 {
                (caret.line, caret.character + tail)
            } else {
                (caret.line + breaks, tail)
            };
            line_delta = end_line as isize - end.line as isize;
            joined = Some((end.line, end_character as isize - end.character as isize));

            Selection::caret(caret)
        })
        .collect()
}

/// Positions of the first non-whitespace character and just past the last one, walking
/// `text` from `start`. `\r\n` counts as a single line break. `None` for blank text.
fn content_bounds(start: Position, text: &str) -> Option<(Position, Position)> {
    let mut pos = start;
    let mut first = None;
    let mut after_last = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => pos = Position::new(pos.line + 1, 0),
            c => {
                let whitespace = c.is_whitespace();
                if !whitespace && first.is_none() {
                    first = Some(pos);
                }
                pos.character += 1;
                if !whitespace {
                    after_last = Some(pos);
                }
            }
        }
    }

    first.zip(after_last)
}
