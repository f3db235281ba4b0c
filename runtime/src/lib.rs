//! Provides the executable form of a compiled pattern and the backtracking
//! machine that evaluates it against a single line of text.
//!
//! # Example
//!
//! ```rust
//! use bre_runtime::*;
//!
//! // approximate to `b*c`
//! let program = Instructions::new(vec![
//!     Opcode::Repeat(Atom::Consume(InstConsume::new(b'b'))),
//!     Opcode::Atom(Atom::Consume(InstConsume::new(b'c'))),
//!     Opcode::Match,
//! ]);
//!
//! // The leftmost starting offset wins, and within a match repetition is
//! // greedy. `abbbc` matches starting at offset 1 through to the end.
//! let found = search(&program, b"abbbc").expect("no limits were set");
//! assert_eq!(Some(1..5), found.map(|m| m.range()));
//! ```

mod backtrack;
mod captures;

pub use captures::{Captures, SaveGroupSlot};

use std::fmt::Display;
use std::ops::Range;

use backtrack::Machine;

/// The maximum number of capture groups a program may reference.
pub const MAX_GROUPS: usize = 9;

/// The historical bound on the compiled size of a program, in size units.
/// See [Opcode::size].
pub const DEFAULT_PROGRAM_SIZE_LIMIT: usize = 8192;

/// The default bound on repetitions pending a retry at once. Each repeated
/// step holds at most one, so no program within the default size limit can
/// reach it.
pub const DEFAULT_MAX_DEPTH: usize = DEFAULT_PROGRAM_SIZE_LIMIT;

/// A prefilter applied by the search driver before attempting a match at a
/// given offset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FastForward {
    #[default]
    None,
    /// Only offsets whose byte equals the value can begin a match.
    Char(u8),
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Instructions {
    anchored: bool,
    fast_forward: FastForward,
    program: Vec<Instruction>,
}

impl Instructions {
    #[must_use]
    pub fn new(program: Vec<Opcode>) -> Self {
        Self {
            anchored: false,
            fast_forward: FastForward::None,
            program: program
                .into_iter()
                .enumerate()
                .map(|(id, opcode)| Instruction::new(id, opcode))
                .collect(),
        }
    }

    /// Marks the program as only matching at the start of a line.
    pub fn with_anchor(self, anchored: bool) -> Self {
        Self { anchored, ..self }
    }

    pub fn with_fast_forward(self, fast_forward: FastForward) -> Self {
        Self {
            fast_forward,
            ..self
        }
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    pub fn fast_forward(&self) -> FastForward {
        self.fast_forward
    }

    pub fn len(&self) -> usize {
        self.program.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the compiled size of the program in size units.
    pub fn size(&self) -> usize {
        self.program.iter().map(|inst| inst.opcode.size()).sum()
    }
}

impl Display for Instructions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for inst in self.program.iter() {
            writeln!(f, "{}", inst)?
        }

        Ok(())
    }
}

impl std::ops::Index<usize> for Instructions {
    type Output = Opcode;

    fn index(&self, index: usize) -> &Self::Output {
        &self.program[index].opcode
    }
}

impl AsRef<[Instruction]> for Instructions {
    fn as_ref(&self) -> &[Instruction] {
        &self.program
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    id: usize,
    opcode: Opcode,
}

impl Instruction {
    #[must_use]
    pub fn new(id: usize, opcode: Opcode) -> Self {
        Self { id, opcode }
    }

    pub fn opcode(&self) -> &Opcode {
        &self.opcode
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}: {}", self.id, self.opcode)
    }
}

/// A single step of a program.
///
/// Only the consuming [Atom]s may be repeated, so group markers, the end of
/// line anchor and the terminating `Match` can never carry a repetition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opcode {
    Atom(Atom),
    /// Zero or more greedy repetitions of an atom.
    Repeat(Atom),
    StartSave(InstStartSave),
    EndSave(InstEndSave),
    EndOfLine,
    Match,
}

impl Opcode {
    /// The number of size units the step occupies in a compiled program.
    pub fn size(&self) -> usize {
        match self {
            Opcode::Atom(atom) | Opcode::Repeat(atom) => atom.size(),
            Opcode::StartSave(_) | Opcode::EndSave(_) => 2,
            Opcode::EndOfLine | Opcode::Match => 1,
        }
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Opcode::Atom(atom) => Display::fmt(atom, f),
            Opcode::Repeat(atom) => write!(f, "Repeat: {}", atom),
            Opcode::StartSave(i) => Display::fmt(&i, f),
            Opcode::EndSave(i) => Display::fmt(&i, f),
            Opcode::EndOfLine => Display::fmt(&InstEndOfLine, f),
            Opcode::Match => Display::fmt(&InstMatch, f),
        }
    }
}

/// A step that consumes input, and therefore may be repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    Consume(InstConsume),
    Any,
    ConsumeSet(InstConsumeSet),
    Backreference(InstBackreference),
}

impl Atom {
    fn size(&self) -> usize {
        match self {
            Atom::Consume(_) | Atom::Backreference(_) => 2,
            Atom::Any => 1,
            // opcode followed by the 16 byte bitmap.
            Atom::ConsumeSet(_) => 17,
        }
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Atom::Consume(i) => Display::fmt(&i, f),
            Atom::Any => Display::fmt(&InstAny::new(), f),
            Atom::ConsumeSet(i) => Display::fmt(&i, f),
            Atom::Backreference(i) => Display::fmt(&i, f),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct InstMatch;

impl Display for InstMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Match",)
    }
}

#[derive(Debug, PartialEq)]
pub struct InstEndOfLine;

impl Display for InstEndOfLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EndOfLine")
    }
}

#[derive(Debug, PartialEq)]
pub struct InstAny;

impl InstAny {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for InstAny {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for InstAny {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Any")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstConsume {
    value: u8,
}

impl InstConsume {
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u8 {
        self.value
    }
}

impl Display for InstConsume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Consume: {:?}", char::from(self.value))
    }
}

/// A 128 entry membership bitmap, indexed by the low 7 bits of a byte.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharacterSet {
    membership: u128,
}

impl CharacterSet {
    pub const fn empty() -> Self {
        Self { membership: 0 }
    }

    pub fn insert(&mut self, value: u8) {
        self.membership |= Self::bit(value);
    }

    pub fn insert_range(&mut self, range: std::ops::RangeInclusive<u8>) {
        for value in range {
            self.insert(value)
        }
    }

    /// Inverts the membership of every entry. The line terminator, `0`, is
    /// never a member of a negated set.
    pub fn invert_membership(self) -> Self {
        Self {
            membership: !self.membership & !Self::bit(0),
        }
    }

    pub fn in_set(&self, value: u8) -> bool {
        self.membership & Self::bit(value) != 0
    }

    pub fn as_bits(&self) -> u128 {
        self.membership
    }

    #[inline]
    fn bit(value: u8) -> u128 {
        1u128 << (value & 0x7f)
    }
}

impl FromIterator<u8> for CharacterSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |mut set, value| {
            set.insert(value);
            set
        })
    }
}

/// ConsumeSet matches a single byte against a bracket expression's bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstConsumeSet {
    set: CharacterSet,
}

impl InstConsumeSet {
    pub fn new(set: CharacterSet) -> Self {
        Self { set }
    }

    pub fn set(&self) -> &CharacterSet {
        &self.set
    }
}

impl Display for InstConsumeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConsumeSet: {{{:#034x}}}", self.set.as_bits())
    }
}

/// Matches the exact text most recently captured by a closed group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstBackreference {
    slot_id: usize,
}

impl InstBackreference {
    #[must_use]
    pub fn new(slot_id: usize) -> Self {
        Self { slot_id }
    }

    pub fn slot_id(&self) -> usize {
        self.slot_id
    }
}

impl Display for InstBackreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Backreference[{:04}]", self.slot_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstStartSave {
    slot_id: usize,
}

impl InstStartSave {
    #[must_use]
    pub fn new(slot_id: usize) -> Self {
        Self { slot_id }
    }

    pub fn slot_id(&self) -> usize {
        self.slot_id
    }
}

impl Display for InstStartSave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StartSave[{:04}]", self.slot_id,)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstEndSave {
    slot_id: usize,
}

impl InstEndSave {
    #[must_use]
    pub fn new(slot_id: usize) -> Self {
        Self { slot_id }
    }

    pub fn slot_id(&self) -> usize {
        self.slot_id
    }
}

impl Display for InstEndSave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EndSave[{:04}]", self.slot_id,)
    }
}

/// Bounds the work a single search may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// The total number of interpreter steps, including backtracking retries,
    /// across every starting offset of a search. `None` is unbounded.
    pub max_steps: Option<u64>,
    /// The maximum number of repetitions pending a retry at once, which is
    /// the nesting depth of the backtracking search.
    pub max_depth: usize,
}

impl Limits {
    pub fn with_max_steps(self, max_steps: u64) -> Self {
        Self {
            max_steps: Some(max_steps),
            ..self
        }
    }

    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_steps: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Represents all error types that may occur while evaluating a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    #[error("search exceeded the step limit of {limit}")]
    StepLimitExceeded { limit: u64 },
    #[error("search exceeded the backtracking depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },
    /// The program ran past its last step without reaching `Match`. Programs
    /// produced by the compiler always terminate in a `Match`.
    #[error("malformed program, no step at {pc:04}")]
    MalformedProgram { pc: usize },
}

/// A successful search, holding the leftmost starting offset, the offset the
/// match ended at and the groups captured along the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    start: usize,
    end: usize,
    captures: Captures,
}

impl Match {
    pub(crate) fn new(start: usize, end: usize, captures: Captures) -> Self {
        Self {
            start,
            end,
            captures,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    /// Returns the span of a closed group, zero-indexed.
    pub fn group(&self, slot_id: usize) -> Option<Range<usize>> {
        self.captures.span(slot_id)
    }
}

/// Searches a line for the leftmost offset at which the program matches,
/// with the default [Limits].
pub fn search(program: &Instructions, line: &[u8]) -> Result<Option<Match>, ExecutionError> {
    search_with_limits(program, line, Limits::default())
}

/// Searches a line for the leftmost offset at which the program matches.
///
/// An anchored program is attempted once at offset 0. Otherwise every offset
/// from 0 through to the length of the line, inclusive, is attempted in order
/// and the first success is returned.
pub fn search_with_limits(
    program: &Instructions,
    line: &[u8],
    limits: Limits,
) -> Result<Option<Match>, ExecutionError> {
    let mut machine = Machine::new(program.as_ref(), line, limits);

    let res = if program.is_anchored() {
        machine.attempt(0)
    } else {
        unanchored_search(&mut machine, program.fast_forward(), line)
    };

    res.map_err(|e| {
        log::warn!("abandoning search of {} byte line: {}", line.len(), e);
        e
    })
}

fn unanchored_search(
    machine: &mut Machine<'_, '_>,
    fast_forward: FastForward,
    line: &[u8],
) -> Result<Option<Match>, ExecutionError> {
    for start in 0..=line.len() {
        if let FastForward::Char(c) = fast_forward {
            if line.get(start) != Some(&c) {
                continue;
            }
        }

        if let Some(found) = machine.attempt(start)? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}
