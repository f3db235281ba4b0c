use crate::find;

#[test]
fn should_find_leftmost_match() {
    let input_output = vec![
        ("abc", "xabcx", Some(1..4)),
        ("abc", "abd", None),
        ("b", "abcb", Some(1..2)),
        ("a*", "bab", Some(0..0)),
        ("", "abc", Some(0..0)),
        ("$", "abc", Some(3..3)),
        ("a$", "ba", Some(1..2)),
        ("a$", "ab", None),
        ("^ab", "ab", Some(0..2)),
        ("^ab", "cab", None),
        ("^$", "", Some(0..0)),
        ("^$", "a", None),
        ("x*$", "abxx", Some(2..4)),
    ];

    for (test_id, (pattern, line, expected)) in input_output.into_iter().enumerate() {
        let res = find(pattern, line).map(|m| m.range());
        assert_eq!((test_id, expected), (test_id, res));
    }
}

#[test]
fn should_treat_misplaced_metacharacters_as_literals() {
    let input_output = vec![
        ("a$b", "a$b", true),
        ("a$b", "ab", false),
        ("*a", "x*a", true),
        ("*a", "xa", false),
        ("^*", "*x", true),
        ("^*", "x", false),
        ("a^", "a^", true),
        (r"\(*\)", "*", true),
        (r"\(*\)", "", false),
        (r"a\.", "ab", false),
        (r"a\.", "a.", true),
    ];

    for (test_id, (pattern, line, matches)) in input_output.into_iter().enumerate() {
        assert_eq!((test_id, matches), (test_id, find(pattern, line).is_some()));
    }
}

#[test]
fn should_match_bracket_expressions() {
    for c in ["a", "b", "c"] {
        assert!(find("[a-c]", c).is_some());
        assert!(find("[^a-c]", c).is_none());
    }
    assert!(find("[a-c]", "d").is_none());
    assert!(find("[^a-c]", "d").is_some());

    // a negated class needs a byte to consume, so never matches at the end.
    assert!(find("[^a-c]", "").is_none());
    assert!(find("x[^a]", "x").is_none());

    assert_eq!(Some(1..2), find("[]]", "a]").map(|m| m.range()));
    assert_eq!(Some(0..3), find("[a-c-e]*", "cde").map(|m| m.range()));
}

#[test]
fn should_match_any_byte_but_not_past_end_of_line() {
    assert_eq!(Some(0..3), find("...", "abc").map(|m| m.range()));
    assert!(find("....", "abc").is_none());
    assert_eq!(Some(1..3), find("b.*", "abc").map(|m| m.range()));
}

#[test]
fn should_repeat_greedily_then_give_back() {
    let input_output = vec![
        ("a*b", "aaab", Some(0..4)),
        ("a*a", "aaa", Some(0..3)),
        ("xa*a", "xaaay", Some(0..4)),
        (".*b", "abab", Some(0..4)),
        ("a*ab", "aaac", None),
    ];

    for (test_id, (pattern, line, expected)) in input_output.into_iter().enumerate() {
        let res = find(pattern, line).map(|m| m.range());
        assert_eq!((test_id, expected), (test_id, res));
    }
}

#[test]
fn should_capture_groups_and_match_backreferences() {
    let m = find(r"\(a*\)b\1", "aabaa").unwrap();
    assert_eq!(0..5, m.range());
    assert_eq!(Some(0..2), m.group(0));

    // the greedy capture of `aa` fails at offset 0, the capture at offset 1
    // succeeds.
    let m = find(r"\(a*\)b\1", "aabab").unwrap();
    assert_eq!(1..4, m.range());
    assert_eq!(Some(1..2), m.group(0));

    assert!(find(r"\(ab\)\1", "abac").is_none());
    assert_eq!(
        Some(0..6),
        find(r"^\(ab\)\1*$", "ababab").map(|m| m.range())
    );
    assert_eq!(
        Some(0..4),
        find(r"\(a\)\(b\)\2\1", "abba").map(|m| m.range())
    );
}

#[test]
fn should_report_group_spans() {
    let m = find(r"\(x\)\(y*\)z", "axyyz").unwrap();

    assert_eq!(1..5, m.range());
    assert_eq!(Some(1..2), m.group(0));
    assert_eq!(Some(2..4), m.group(1));
    assert_eq!(None, m.group(2));
    assert_eq!(None, m.group(9));

    // an empty repetition still records an empty span.
    let m = find(r"\(y*\)z", "z").unwrap();
    assert_eq!(Some(0..0), m.group(0));
}

#[test]
fn should_match_bytes_outside_ascii() {
    let program = bre_compiler::compile([b'\xe9', b'*', b'x']).unwrap();

    let res = bre_runtime::search(&program, b"a\xe9\xe9x").unwrap();
    assert_eq!(Some(1..4), res.map(|m| m.range()));
}
