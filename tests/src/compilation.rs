use bre_compiler::{compile, CompileError};
use bre_runtime::MAX_GROUPS;

#[test]
fn should_compile_deterministically() {
    let patterns = [r"^\(a*\)[b-d]\1.$", "x*y", "[^]a-]*$", ""];

    for (test_id, pattern) in patterns.into_iter().enumerate() {
        let first = compile(pattern).unwrap();
        let second = compile(pattern).unwrap();

        assert_eq!((test_id, &first), (test_id, &second));
        assert_eq!((test_id, first.to_string()), (test_id, second.to_string()));
    }
}

#[test]
fn should_reject_unusable_backreferences() {
    let input_output = vec![
        (r"\1\(a\)", CompileError::InvalidBackreference { offset: 0, group: 1 }),
        (r"\(a\1\)", CompileError::InvalidBackreference { offset: 3, group: 1 }),
        (r"\(a\)\2", CompileError::InvalidBackreference { offset: 5, group: 2 }),
        (r"\(a\)\9", CompileError::InvalidBackreference { offset: 5, group: 9 }),
    ];

    for (test_id, (pattern, expected)) in input_output.into_iter().enumerate() {
        assert_eq!((test_id, Err(expected)), (test_id, compile(pattern)));
    }

    // `\0` escapes a literal zero rather than referencing a group.
    assert!(compile(r"\(a\)\0").is_ok());
}

#[test]
fn should_reject_every_malformed_pattern_category() {
    let too_many_groups = r"\(".repeat(MAX_GROUPS + 1);

    let input_output = vec![
        ("[abc", CompileError::MalformedClass { offset: 0 }),
        ("[c-a]", CompileError::InvalidRange { offset: 0, lower: 'c', upper: 'a' }),
        (too_many_groups.as_str(), CompileError::TooManyGroups { offset: 18 }),
        (r"a\)", CompileError::UnmatchedGroupClose { offset: 1 }),
        (r"a\(b", CompileError::UnterminatedGroup { offset: 1 }),
        ("ab\\", CompileError::TrailingBackslash { offset: 2 }),
        ("a\0b", CompileError::EmbeddedNul { offset: 1 }),
    ];

    for (test_id, (pattern, expected)) in input_output.into_iter().enumerate() {
        assert_eq!((test_id, Err(expected)), (test_id, compile(pattern)));
    }
}

#[test]
fn should_report_leftmost_of_several_errors() {
    let input_output = vec![
        (r"\)[", CompileError::UnmatchedGroupClose { offset: 0 }),
        (r"[z-a][", CompileError::InvalidRange { offset: 0, lower: 'z', upper: 'a' }),
        (r"\2\(a\)\", CompileError::InvalidBackreference { offset: 0, group: 2 }),
        ("\\(\\(a\0", CompileError::EmbeddedNul { offset: 5 }),
    ];

    for (test_id, (pattern, expected)) in input_output.into_iter().enumerate() {
        assert_eq!((test_id, Err(expected)), (test_id, compile(pattern)));
    }
}

#[test]
fn should_print_compiled_program() {
    let program = compile(r"^\(a*\)[b]\1$").unwrap();

    assert_eq!(
        "0000: StartSave[0000]
0001: Repeat: Consume: 'a'
0002: EndSave[0000]
0003: ConsumeSet: {0x00000004000000000000000000000000}
0004: Backreference[0000]
0005: EndOfLine
0006: Match
",
        program.to_string()
    );
}
