//! Provides for the parsing and compilation of a basic regular expression
//! into its corresponding runtime program.
//!
//! # Example
//!
//! ```rust
//! // Parsing and compilation of a pattern into a runnable program is
//! // accomplished by a single function exposed in the `bre_compiler` crate.
//! use bre_compiler::compile;
//!
//! // Evaluating a line against a program is accomplished via a single
//! // exposed function in the `bre_runtime` crate.
//! use bre_runtime::search;
//!
//! // A pattern capturing a doubled letter.
//! let program = compile(r"\(l\)\1").expect("failed to compile");
//!
//! let matched = search(&program, b"hello world").expect("search exceeded its budget");
//!
//! // A match reports the non-inclusive range of the line it covers, along
//! // with the span of each group. In this case the match covers index 2 and
//! // 3 of the line, or `ll`, and the first group covers the first `l`.
//! assert_eq!(Some(2..4), matched.as_ref().map(|m| m.range()));
//! assert_eq!(Some(2..3), matched.and_then(|m| m.group(0)));
//! ```

pub mod ast;
mod class;
pub mod compiler;
mod error;
pub mod parser;

use bre_runtime::{Instructions, DEFAULT_PROGRAM_SIZE_LIMIT};

pub use error::CompileError;
pub use parser::parse;

/// Compiles a pattern into a program, bounded by the default size limit.
pub fn compile<P: AsRef<[u8]>>(pattern: P) -> Result<Instructions, CompileError> {
    compile_with_size_limit(pattern, DEFAULT_PROGRAM_SIZE_LIMIT)
}

/// Compiles a pattern into a program whose total size may not exceed
/// `size_limit` units.
pub fn compile_with_size_limit<P: AsRef<[u8]>>(
    pattern: P,
    size_limit: usize,
) -> Result<Instructions, CompileError> {
    let input: Vec<(usize, char)> = pattern
        .as_ref()
        .iter()
        .copied()
        .map(char::from)
        .enumerate()
        .collect();

    let (regex, unparsed) = parser::parse_prefix(&input);
    let program = compiler::compile_prefix(regex, unparsed, size_limit)?;

    log::debug!(
        "compiled {} instructions, size {}/{}, anchored: {}, fast-forward: {:?}",
        program.len(),
        program.size(),
        size_limit,
        program.is_anchored(),
        program.fast_forward()
    );

    Ok(program)
}
