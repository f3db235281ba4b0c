/// Rewrites a pattern to match without regard to the case of its lowercase
/// letters, replacing each lowercase ASCII letter `c` with `[Cc]`.
///
/// Escaped bytes and bracket expressions are copied through unchanged, as is
/// an unterminated bracket expression, which is left for the compiler to
/// reject.
pub fn fold_case(pattern: &[u8]) -> Vec<u8> {
    let mut folded = Vec::with_capacity(pattern.len());
    let mut bytes = pattern.iter().copied().peekable();

    while let Some(b) = bytes.next() {
        match b {
            b'\\' => {
                folded.push(b);
                folded.extend(bytes.next());
            }
            b'[' => {
                folded.push(b);
                folded.extend(bytes.next_if_eq(&b'^'));
                // a leading `]` is a member rather than the terminator.
                folded.extend(bytes.next_if_eq(&b']'));
                for member in bytes.by_ref() {
                    folded.push(member);
                    if member == b']' {
                        break;
                    }
                }
            }
            b if b.is_ascii_lowercase() => {
                folded.extend_from_slice(&[b'[', b.to_ascii_uppercase(), b, b']']);
            }
            b => folded.push(b),
        }
    }

    folded
}
