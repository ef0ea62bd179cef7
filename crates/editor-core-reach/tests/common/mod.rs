#![allow(dead_code)]

use std::collections::VecDeque;

use editor_core_reach::{
    DirectionRequest, NotFoundAnswer, NotFoundRequest, PatternRequest, Position, Prompter,
    RopeBuffer, Selection, SelectionDirection, SpaceRequest,
};

/// Replays canned answers in order and records what was asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    pub patterns: VecDeque<Option<String>>,
    pub includes: VecDeque<Option<bool>>,
    pub not_found: VecDeque<Option<NotFoundAnswer>>,
    pub spaces: VecDeque<Option<bool>>,
    pub directions: VecDeque<Option<SelectionDirection>>,
    /// `(selections.len(), per_selection)` for every not-found prompt.
    pub not_found_asked: Vec<(usize, bool)>,
    /// `(ranges.len(), per_selection)` for every space prompt.
    pub spaces_asked: Vec<(usize, bool)>,
    pub directions_asked: Vec<DirectionRequest>,
    pub remembered: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the pattern prompt, and the include prompt for a non-empty pattern.
    pub fn pattern(source: &str, include: bool) -> Self {
        let mut prompter = Self::new();
        prompter.patterns.push_back(Some(source.to_string()));
        if !source.is_empty() {
            prompter.includes.push_back(Some(include));
        }
        prompter
    }

    pub fn not_found(mut self, answer: Option<NotFoundAnswer>) -> Self {
        self.not_found.push_back(answer);
        self
    }

    pub fn spaces(mut self, answer: Option<bool>) -> Self {
        self.spaces.push_back(answer);
        self
    }

    pub fn direction(mut self, answer: Option<SelectionDirection>) -> Self {
        self.directions.push_back(answer);
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn ask_for_pattern(&mut self, _request: &PatternRequest) -> Option<String> {
        self.patterns.pop_front().expect("unexpected pattern prompt")
    }

    fn ask_include_match(&mut self, _pattern: &str) -> Option<bool> {
        self.includes.pop_front().expect("unexpected include prompt")
    }

    fn ask_not_found(&mut self, request: &NotFoundRequest<'_>) -> Option<NotFoundAnswer> {
        self.not_found_asked
            .push((request.selections.len(), request.per_selection));
        self.not_found.pop_front().expect("unexpected not-found prompt")
    }

    fn ask_space_replacement(&mut self, request: &SpaceRequest<'_>) -> Option<bool> {
        self.spaces_asked
            .push((request.ranges.len(), request.per_selection));
        self.spaces.pop_front().expect("unexpected space prompt")
    }

    fn ask_selection_direction(
        &mut self,
        request: &DirectionRequest,
    ) -> Option<SelectionDirection> {
        self.directions_asked.push(*request);
        self.directions.pop_front().expect("unexpected direction prompt")
    }

    fn remember_pattern(&mut self, pattern: &str) {
        self.remembered.push(pattern.to_string());
    }
}

pub fn caret(line: usize, character: usize) -> Selection {
    Selection::caret(Position::new(line, character))
}

pub fn select(anchor: (usize, usize), head: (usize, usize)) -> Selection {
    Selection::new(
        Position::new(anchor.0, anchor.1),
        Position::new(head.0, head.1),
    )
}

pub fn buffer(text: &str, selections: Vec<Selection>) -> RopeBuffer {
    RopeBuffer::new(text).with_selections(selections)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
