use bre_compiler::compile;
use bre_runtime::{
    search, search_with_limits, ExecutionError, Limits, DEFAULT_PROGRAM_SIZE_LIMIT,
};

#[test]
fn should_abort_pathological_backtracking_under_step_budget() {
    let program = compile("a*a*a*a*a*a*a*a*a*a*b").unwrap();
    let line = "a".repeat(64);
    let limits = Limits::default().with_max_steps(100_000);

    assert_eq!(
        Err(ExecutionError::StepLimitExceeded { limit: 100_000 }),
        search_with_limits(&program, line.as_bytes(), limits)
    );
}

#[test]
fn should_terminate_nested_repetition_on_long_line() {
    let program = compile("a*a*a*a*a*a*a*a*b").unwrap();
    let line = "a".repeat(24);
    let limits = Limits::default().with_max_steps(50_000);

    assert!(search_with_limits(&program, line.as_bytes(), limits).is_err());
}

#[test]
fn should_not_change_results_within_budget() {
    let patterns = [r"\(a*\)b\1", "x*y*z", "^[a-c]*d$", r"\(ab\)*\1"];
    let lines = ["aabaa", "aabab", "xxyz", "abcd", "abab", ""];
    let limits = Limits::default().with_max_steps(1_000_000).with_max_depth(64);

    for (test_id, pattern) in patterns.into_iter().enumerate() {
        let program = compile(pattern).unwrap();

        for line in lines {
            assert_eq!(
                (test_id, line, search(&program, line.as_bytes())),
                (
                    test_id,
                    line,
                    search_with_limits(&program, line.as_bytes(), limits)
                )
            );
        }
    }
}

#[test]
fn should_bound_backtracking_depth_by_program_length() {
    // each repeated step holds at most one pending retry, so the depth
    // reached on a long line is independent of the line's length.
    let program = compile("a*b*c*d").unwrap();
    let line = format!(
        "{}{}{}d",
        "a".repeat(5_000),
        "b".repeat(5_000),
        "c".repeat(5_000)
    );
    let limits = Limits::default().with_max_depth(program.len() + 1);

    assert_eq!(
        Ok(Some(0..15_001)),
        search_with_limits(&program, line.as_bytes(), limits).map(|m| m.map(|m| m.range()))
    );
}

#[test]
fn should_search_largest_pattern_with_default_limits() {
    let pattern = ".*".repeat(DEFAULT_PROGRAM_SIZE_LIMIT - 1);
    let program = compile(&pattern).unwrap();
    assert_eq!(DEFAULT_PROGRAM_SIZE_LIMIT, program.size());

    assert_eq!(
        Ok(Some(0..3)),
        search(&program, b"abc").map(|m| m.map(|m| m.range()))
    );

    // every repetition is pending when the final literal fails.
    let pattern = format!("{}z", ".*".repeat(DEFAULT_PROGRAM_SIZE_LIMIT - 3));
    let program = compile(&pattern).unwrap();
    assert_eq!(DEFAULT_PROGRAM_SIZE_LIMIT, program.size());

    assert_eq!(Ok(None), search(&program, b""));
}
