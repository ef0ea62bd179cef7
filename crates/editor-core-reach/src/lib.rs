#![warn(missing_docs)]
//! Editor Core Reach - select-to / delete-to for multi-caret editors
//!
//! # Overview
//!
//! `editor-core-reach` computes, for every selection of a multi-selection, how far a
//! "delete/select to the left or right" command reaches: to the line edge, to the adjacent line
//! when every caret already sits on the edge, or up to a user pattern (literal or `/regex/flags`)
//! on the same line or across lines. The resolved ranges are merged and submitted to the host
//! buffer as one atomic edit (or one selection set).
//!
//! The crate is headless: the host supplies the document through [`TextBuffer`] and the UI
//! through [`Prompter`].
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  RangeExecutor (commands, reports)          │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Policy (Prompter, ExecutionContext)        │  ← Host decisions
//! ├─────────────────────────────────────────────┤
//! │  Merge                                      │  ← Overlap folding
//! ├─────────────────────────────────────────────┤
//! │  Resolver (edge, multiline)                 │  ← Destinations
//! ├─────────────────────────────────────────────┤
//! │  Pattern / Search                           │  ← Matching
//! ├─────────────────────────────────────────────┤
//! │  TextBuffer (RopeBuffer)                    │  ← Document access
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use editor_core_reach::{
//!     Direction, DirectionRequest, NotFoundAnswer, NotFoundRequest, Options, PatternRequest,
//!     Position, Prompter, RangeExecutor, RopeBuffer, Selection, SelectionDirection,
//!     SpaceRequest,
//! };
//!
//! struct NoPrompts;
//!
//! impl Prompter for NoPrompts {
//!     fn ask_for_pattern(&mut self, _: &PatternRequest) -> Option<String> { None }
//!     fn ask_include_match(&mut self, _: &str) -> Option<bool> { None }
//!     fn ask_not_found(&mut self, _: &NotFoundRequest<'_>) -> Option<NotFoundAnswer> { None }
//!     fn ask_space_replacement(&mut self, _: &SpaceRequest<'_>) -> Option<bool> { None }
//!     fn ask_selection_direction(&mut self, _: &DirectionRequest) -> Option<SelectionDirection> {
//!         None
//!     }
//! }
//!
//! let mut buffer = RopeBuffer::new("    let x = 1;\n    let y = 2;").with_selections(vec![
//!     Selection::caret(Position::new(0, 14)),
//!     Selection::caret(Position::new(1, 14)),
//! ]);
//! let mut executor = RangeExecutor::new(Options::default(), NoPrompts);
//!
//! // Delete left stops at the indentation of each line.
//! executor.delete_left(Some(&mut buffer)).unwrap();
//! assert_eq!(buffer.text(), "    \n    ");
//! ```
//!
//! # Module Description
//!
//! - [`position`] - Position / Range / Direction value types
//! - [`selection`] - Selections and edit ranges
//! - [`pattern`] - Literal and `/regex/flags` pattern compiler
//! - [`search`] - Character-offset regex scanning
//! - [`buffer`] - Host document interface and a rope-backed implementation
//! - [`edge`] - Single-line destination resolution
//! - [`multiline`] - Edge hand-off and multiline pattern search
//! - [`merge`] - Overlap merging
//! - [`policy`] - Host prompts and per-execution policy state
//! - [`executor`] - Command orchestration
//! - [`options`] - Configuration
//!
//! # Coordinates
//!
//! All positions are logical `(line, character)` pairs counted in Unicode scalar values. Lines
//! are split on `\r?\n`.

pub mod buffer;
pub mod edge;
pub mod error;
pub mod executor;
pub mod merge;
pub mod multiline;
pub mod options;
pub mod pattern;
pub mod policy;
pub mod position;
pub mod search;
pub mod selection;
mod text;

pub use buffer::{RopeBuffer, TextBuffer};
pub use edge::{IndentRule, Resolution, Resolver};
pub use error::ReachError;
pub use executor::{Command, ExecutionReport, Notice, NoticeLevel, RangeExecutor};
pub use merge::merge_ranges;
pub use multiline::{find_in_block, find_line_by_line};
pub use options::{IndentStop, NotFoundPolicy, Options, PredefinedPattern, SearchMode, SpacePolicy};
pub use pattern::{Pattern, PatternError};
pub use policy::{
    DirectionRequest, ExecutionContext, NotFoundAnswer, NotFoundRequest, PatternRequest, Prompter,
    SpaceRequest,
};
pub use position::{Direction, Position, Range};
pub use search::SearchMatch;
pub use selection::{EditRange, Selection, SelectionDirection, TextEdit};
