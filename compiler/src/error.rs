/// Represents every reason a pattern may fail to compile. Offsets are byte
/// offsets into the pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("unterminated or malformed bracket expression at offset {offset}")]
    MalformedClass { offset: usize },
    #[error("invalid range {lower:?}-{upper:?} in bracket expression at offset {offset}")]
    InvalidRange {
        offset: usize,
        lower: char,
        upper: char,
    },
    #[error("too many groups at offset {offset}, at most {} are supported", bre_runtime::MAX_GROUPS)]
    TooManyGroups { offset: usize },
    #[error("unmatched \\) at offset {offset}")]
    UnmatchedGroupClose { offset: usize },
    #[error("unterminated group opened at offset {offset}")]
    UnterminatedGroup { offset: usize },
    #[error("invalid backreference \\{group} at offset {offset}, no such group has been closed")]
    InvalidBackreference { offset: usize, group: u8 },
    #[error("trailing backslash at offset {offset}")]
    TrailingBackslash { offset: usize },
    #[error("embedded NUL at offset {offset}")]
    EmbeddedNul { offset: usize },
    #[error("pattern exceeds the compiled size limit of {limit}")]
    ProgramTooLarge { limit: usize },
    #[error("undefined parse error: {0}")]
    Undefined(String),
}
