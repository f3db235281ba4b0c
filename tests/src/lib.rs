//! End-to-end behaviour of compiled patterns searched against lines.

#[cfg(test)]
mod compilation;
#[cfg(test)]
mod execution_limits;
#[cfg(test)]
mod matching;

#[cfg(test)]
pub(crate) fn find(pattern: &str, line: &str) -> Option<bre_runtime::Match> {
    let program = bre_compiler::compile(pattern).unwrap();
    bre_runtime::search(&program, line.as_bytes()).unwrap()
}
