mod common;

use common::{ScriptedPrompter, buffer, caret, init_tracing, select};
use editor_core_reach::{
    Command, Direction, ExecutionReport, NotFoundAnswer, NotFoundPolicy, Notice, NoticeLevel,
    Options, PatternError, Position, RangeExecutor, ReachError, RopeBuffer, SelectionDirection,
    SpacePolicy, TextBuffer,
};
use pretty_assertions::assert_eq;

fn executor(options: Options, prompter: ScriptedPrompter) -> RangeExecutor<ScriptedPrompter> {
    init_tracing();
    RangeExecutor::new(options, prompter)
}

fn policy(not_found: NotFoundPolicy) -> Options {
    Options {
        not_found,
        ..Options::default()
    }
}

#[test]
fn test_no_active_buffer_is_a_no_op() {
    let mut ex = executor(Options::default(), ScriptedPrompter::new());

    let report = ex
        .execute::<RopeBuffer>(None, Command::DeleteToPattern {
            direction: Direction::Right,
            multiline: false,
        })
        .unwrap();

    assert_eq!(report, ExecutionReport::default());
    assert!(ex.prompter().remembered.is_empty());
}

#[test]
fn test_overlapping_reaches_are_merged() {
    let mut doc = buffer("abc def", vec![caret(0, 1), caret(0, 5)]);
    let mut ex = executor(Options::default(), ScriptedPrompter::new());

    let report = ex.delete_right(Some(&mut doc)).unwrap();

    assert_eq!(doc.text(), "a");
    assert_eq!(report.merged, 1);
    assert_eq!(report.notices, vec![Notice::SelectionsMerged(1)]);
}

#[test]
fn test_not_found_ask_per_execution_asks_once() {
    let mut doc = buffer("abc\nxyz", vec![caret(0, 0), caret(1, 0)]);
    let prompter =
        ScriptedPrompter::pattern("#", false).not_found(Some(NotFoundAnswer::SkipSelection));
    let mut ex = executor(Options::default(), prompter);

    let report = ex.delete_to_pattern_right(Some(&mut doc)).unwrap();

    assert_eq!(doc.text(), "abc\nxyz");
    assert_eq!(ex.prompter().not_found_asked, vec![(2, false)]);
    assert_eq!(report.skipped, 2);
    assert_eq!(
        report.notices,
        vec![Notice::SelectionsSkipped(2), Notice::NothingDeleted]
    );
}

#[test]
fn test_not_found_ask_per_selection_asks_each_time() {
    let mut doc = buffer("abc\nxyz", vec![caret(0, 0), caret(1, 0)]);
    let prompter = ScriptedPrompter::pattern("#", false)
        .not_found(Some(NotFoundAnswer::ProcessEverything))
        .not_found(Some(NotFoundAnswer::SkipSelection));
    let mut ex = executor(policy(NotFoundPolicy::AskPerSelection), prompter);

    ex.delete_to_pattern_right(Some(&mut doc)).unwrap();

    assert_eq!(doc.text(), "\nxyz");
    assert_eq!(ex.prompter().not_found_asked, vec![(1, true), (1, true)]);
}

#[test]
fn test_static_not_found_policy_never_prompts() {
    let mut doc = buffer("abc # def\nxyz", vec![caret(0, 0), caret(1, 0)]);
    let mut ex = executor(
        policy(NotFoundPolicy::ProcessEverything),
        ScriptedPrompter::pattern("#", false),
    );

    ex.delete_to_pattern_right(Some(&mut doc)).unwrap();

    assert_eq!(doc.text(), "# def\n");
    assert!(ex.prompter().not_found_asked.is_empty());
}

#[test]
fn test_skipped_select_keeps_original_selection() {
    let mut doc = buffer("abc", vec![select((0, 1), (0, 2))]);
    let mut ex = executor(
        policy(NotFoundPolicy::SkipSelection),
        ScriptedPrompter::pattern("#", false),
    );

    let report = ex.select_to_pattern_right(Some(&mut doc)).unwrap();

    assert_eq!(doc.selections()[0].range, select((0, 1), (0, 2)).range);
    assert!(report.has_notice(Notice::SelectionsSkipped(1)));
    assert!(report.has_notice(Notice::NoSelectionChanged));
}

#[test]
fn test_select_to_current_extent_reports_no_change() {
    let mut doc = buffer("foo, bar", vec![select((0, 4), (0, 8))]);
    let mut ex = executor(Options::default(), ScriptedPrompter::pattern(",", false));

    let report = ex.select_to_pattern_left(Some(&mut doc)).unwrap();

    // The comma ends right at the selection start: the selection already reaches it.
    assert_eq!(report.notices, vec![Notice::NoSelectionChanged]);
    assert!(doc.selections()[0].range.same_span(&select((0, 4), (0, 8)).range));
    assert!(ex.prompter().not_found_asked.is_empty());
}

#[test]
fn test_invalid_pattern_leaves_buffer_untouched() {
    let mut doc = buffer("a [b] c", vec![caret(0, 0)]);
    let mut ex = executor(Options::default(), ScriptedPrompter::pattern("/[/", false));

    let err = ex.delete_to_pattern_right(Some(&mut doc)).unwrap_err();

    assert!(matches!(
        err,
        ReachError::InvalidPattern(PatternError::InvalidRegex { .. })
    ));
    assert_eq!(err.level(), NoticeLevel::Error);
    assert_eq!(doc.text(), "a [b] c");
    assert_eq!(doc.selections()[0].range.head(), Position::new(0, 0));
    assert_eq!(ex.prompter().remembered, vec!["/[/".to_string()]);
}

#[test]
fn test_dismissed_pattern_prompt_cancels() {
    let mut prompter = ScriptedPrompter::new();
    prompter.patterns.push_back(None);
    let mut doc = buffer("abc", vec![caret(0, 0)]);
    let mut ex = executor(Options::default(), prompter);

    let err = ex.delete_to_pattern_right(Some(&mut doc)).unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(err.level(), NoticeLevel::Warning);
    assert!(ex.prompter().remembered.is_empty());
}

#[test]
fn test_dismissed_include_prompt_still_remembers_pattern() {
    let mut prompter = ScriptedPrompter::new();
    prompter.patterns.push_back(Some("b".to_string()));
    prompter.includes.push_back(None);
    let mut doc = buffer("abc", vec![caret(0, 0)]);
    let mut ex = executor(Options::default(), prompter);

    let err = ex.select_to_pattern_right(Some(&mut doc)).unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(ex.prompter().remembered, vec!["b".to_string()]);
}

#[test]
fn test_dismissed_not_found_prompt_commits_nothing() {
    // The first caret resolves fine; the second one cancels the whole batch.
    let mut doc = buffer("a,b\nxyz", vec![caret(0, 0), caret(1, 0)]);
    let prompter = ScriptedPrompter::pattern(",", false).not_found(None);
    let mut ex = executor(Options::default(), prompter);

    let err = ex.delete_to_pattern_right(Some(&mut doc)).unwrap_err();

    assert!(matches!(err, ReachError::Cancelled));
    assert_eq!(doc.text(), "a,b\nxyz");
}

#[test]
fn test_overwrite_plain_delete_fills_with_spaces() {
    let mut doc = buffer("abc def", vec![caret(0, 3)]);
    doc.set_overwrite_mode(true);
    let mut ex = executor(Options::default(), ScriptedPrompter::new());

    ex.delete_right(Some(&mut doc)).unwrap();

    assert_eq!(doc.text(), "abc    ");
    assert_eq!(doc.selections()[0].range.head(), Position::new(0, 3));
}

#[test]
fn test_overwrite_keeps_alignment_before_content() {
    let mut doc = buffer("a, b, c", vec![caret(0, 0)]);
    doc.set_overwrite_mode(true);
    let mut ex = executor(Options::default(), ScriptedPrompter::pattern(",", true));

    ex.delete_to_pattern_right(Some(&mut doc)).unwrap();

    assert_eq!(doc.text(), "   b, c");
    assert!(ex.prompter().spaces_asked.is_empty());
}

#[test]
fn test_overwrite_at_line_end_follows_space_policy() {
    let options = Options {
        replace_with_spaces: SpacePolicy::AskPerExecution,
        ..Options::default()
    };
    let mut doc = buffer("abc\nabc", vec![caret(0, 0), caret(1, 0)]);
    doc.set_overwrite_mode(true);
    let mut ex = executor(options, ScriptedPrompter::pattern("c", true).spaces(Some(false)));

    ex.delete_to_pattern_right(Some(&mut doc)).unwrap();

    assert_eq!(doc.text(), "\n");
    assert_eq!(ex.prompter().spaces_asked, vec![(2, false)]);
    let carets: Vec<Position> = doc.selections().iter().map(|s| s.range.head()).collect();
    assert_eq!(carets, vec![Position::new(0, 0), Position::new(1, 0)]);
}

#[test]
fn test_overwrite_deleted_lines_shift_later_carets() {
    let options = Options {
        not_found_multiline: NotFoundPolicy::ProcessEverything,
        ..Options::default()
    };
    let mut doc = buffer("1\nx\n2\nx", vec![caret(0, 0), caret(2, 0)]);
    doc.set_overwrite_mode(true);
    let mut ex = executor(options, ScriptedPrompter::pattern("x", true));

    ex.delete_to_pattern_right_multiline(Some(&mut doc)).unwrap();

    assert_eq!(doc.text(), "\n");
    let carets: Vec<Position> = doc.selections().iter().map(|s| s.range.head()).collect();
    assert_eq!(carets, vec![Position::new(0, 0), Position::new(1, 0)]);
    assert!(carets.iter().all(|caret| caret.line < doc.line_count()));
}

#[test]
fn test_overwrite_asks_space_policy_per_selection() {
    let options = Options {
        replace_with_spaces: SpacePolicy::AskPerSelection,
        ..Options::default()
    };
    let mut doc = buffer("abc\nabc", vec![caret(0, 0), caret(1, 0)]);
    doc.set_overwrite_mode(true);
    let prompter = ScriptedPrompter::pattern("c", true)
        .spaces(Some(true))
        .spaces(Some(false));
    let mut ex = executor(options, prompter);

    ex.delete_to_pattern_right(Some(&mut doc)).unwrap();

    // First range filled, second one deleted.
    assert_eq!(doc.text(), "   \n");
    assert_eq!(ex.prompter().spaces_asked, vec![(1, true), (1, true)]);
    let carets: Vec<Position> = doc.selections().iter().map(|s| s.range.head()).collect();
    assert_eq!(carets, vec![Position::new(0, 0), Position::new(1, 0)]);
}

#[test]
fn test_overwrite_static_yes_fills_at_line_end() {
    let options = Options {
        replace_with_spaces: SpacePolicy::Yes,
        ..Options::default()
    };
    let mut doc = buffer("abc", vec![caret(0, 0)]);
    doc.set_overwrite_mode(true);
    let mut ex = executor(options, ScriptedPrompter::pattern("c", true));

    ex.delete_to_pattern_right(Some(&mut doc)).unwrap();

    assert_eq!(doc.text(), "   ");
}

#[test]
fn test_change_direction_auto_flips_uniform_selections() {
    let mut doc = buffer("abc def", vec![select((0, 0), (0, 3)), select((0, 4), (0, 7))]);
    let mut ex = executor(Options::default(), ScriptedPrompter::new());

    ex.change_selection_direction(Some(&mut doc)).unwrap();

    let directions: Vec<SelectionDirection> =
        doc.selections().iter().map(|s| s.direction()).collect();
    assert_eq!(
        directions,
        vec![SelectionDirection::RightToLeft, SelectionDirection::RightToLeft]
    );
    assert!(doc.selections()[0].primary);
}

#[test]
fn test_change_direction_asks_for_mixed_selections() {
    let mut doc = buffer("abc def", vec![select((0, 0), (0, 3)), select((0, 7), (0, 4))]);
    let prompter = ScriptedPrompter::new().direction(Some(SelectionDirection::LeftToRight));
    let mut ex = executor(Options::default(), prompter);

    ex.change_selection_direction(Some(&mut doc)).unwrap();

    assert!(doc.selections().iter().all(|s| !s.range.reversed));
    let asked = ex.prompter().directions_asked[0];
    assert_eq!((asked.count, asked.all_same, asked.any_reversed), (2, false, true));
}

#[test]
fn test_change_direction_to_current_reports_no_change() {
    let options = Options {
        auto_flip_direction: false,
        ..Options::default()
    };
    let mut doc = buffer("abc", vec![select((0, 3), (0, 0))]);
    let prompter = ScriptedPrompter::new().direction(Some(SelectionDirection::RightToLeft));
    let mut ex = executor(options, prompter);

    let report = ex.change_selection_direction(Some(&mut doc)).unwrap();

    assert_eq!(report.notices, vec![Notice::NoSelectionChanged]);
    assert!(doc.selections()[0].range.reversed);
}

#[test]
fn test_change_direction_dismissed() {
    let mut doc = buffer("abc def", vec![select((0, 0), (0, 3)), select((0, 7), (0, 4))]);
    let mut ex = executor(Options::default(), ScriptedPrompter::new().direction(None));

    let err = ex.change_selection_direction(Some(&mut doc)).unwrap_err();

    assert!(err.is_cancelled());
    assert!(doc.selections()[1].range.reversed);
}

#[test]
fn test_trim_selection_shrinks_past_whitespace() {
    let mut doc = buffer(
        "  abc  \n   \nx\r\n  y",
        vec![select((0, 7), (0, 0)), select((1, 0), (1, 3)), select((2, 1), (3, 3))],
    );
    let mut ex = executor(Options::default(), ScriptedPrompter::new());

    let report = ex.trim_selection(Some(&mut doc)).unwrap();

    let selections = doc.selections();
    assert_eq!(selections[0].range.start, Position::new(0, 2));
    assert_eq!(selections[0].range.end, Position::new(0, 5));
    assert!(selections[0].range.reversed);
    // Whitespace-only selections stay as they are.
    assert_eq!(selections[1].range, select((1, 0), (1, 3)).range);
    assert_eq!(selections[2].range.start, Position::new(3, 2));
    assert_eq!(selections[2].range.end, Position::new(3, 3));
    assert_eq!(report.notices, vec![]);
}

#[test]
fn test_trim_without_surrounding_whitespace_reports_no_change() {
    let mut doc = buffer("abc", vec![select((0, 0), (0, 3)), caret(0, 1)]);
    let mut ex = executor(Options::default(), ScriptedPrompter::new());

    let report = ex.trim_selection(Some(&mut doc)).unwrap();

    assert_eq!(report.notices, vec![Notice::NoSelectionChanged]);
}

#[test]
fn test_options_from_toml_drive_execution() {
    let options = Options::from_toml_str(
        r#"
        stop-at-indent = "no"
        not-found = "process-everything"
        "#,
    )
    .unwrap();
    let mut doc = buffer("    let x", vec![caret(0, 9)]);
    let mut ex = executor(options, ScriptedPrompter::pattern("#", false));

    ex.delete_to_pattern_left(Some(&mut doc)).unwrap();

    // Not found and not stopping at the indentation: the whole line goes.
    assert_eq!(doc.text(), "");
}

#[test]
fn test_ask_per_execution_answer_resets_between_commands() {
    let mut doc = buffer("abc\ndef", vec![caret(0, 0), caret(1, 0)]);
    let prompter =
        ScriptedPrompter::pattern("#", false).not_found(Some(NotFoundAnswer::SkipSelection));
    let mut ex = executor(Options::default(), prompter);

    let report = ex.delete_to_pattern_right(Some(&mut doc)).unwrap();
    assert_eq!(
        report.notices,
        vec![Notice::SelectionsSkipped(2), Notice::NothingDeleted]
    );
    assert_eq!(doc.text(), "abc\ndef");

    let next = ex.prompter_mut();
    next.patterns.push_back(Some("#".to_string()));
    next.includes.push_back(Some(false));
    next.not_found.push_back(Some(NotFoundAnswer::ProcessEverything));

    ex.delete_to_pattern_right(Some(&mut doc)).unwrap();

    // Asked once per command, the skip answer was not carried over.
    assert_eq!(ex.prompter().not_found_asked, vec![(2, false), (2, false)]);
    assert_eq!(doc.text(), "\n");
}
