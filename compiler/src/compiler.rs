//! Lowers a parsed [ast::Regex] into a runtime program.

use bre_runtime::*;

use crate::ast;
use crate::class;
use crate::CompileError;

/// Compiles a parsed pattern into a program, failing if the program's size
/// exceeds `size_limit` units.
pub fn compile(regex: ast::Regex, size_limit: usize) -> Result<Instructions, CompileError> {
    compile_prefix(regex, None, size_limit)
}

/// Compiles the well formed prefix of a pattern whose remainder failed to
/// parse with `unparsed`. Errors are reported in pattern order, so an error
/// within the prefix takes precedence over `unparsed`.
pub(crate) fn compile_prefix(
    regex: ast::Regex,
    unparsed: Option<CompileError>,
    size_limit: usize,
) -> Result<Instructions, CompileError> {
    let (anchored, ast::Expression(tokens)) = match regex {
        ast::Regex::StartOfLineAnchored(expression) => (true, expression),
        ast::Regex::Unanchored(expression) => (false, expression),
    };

    // a prefix never ends the pattern, so a trailing `$` in it is a literal.
    let last = match unparsed {
        Some(_) => None,
        None => tokens.len().checked_sub(1),
    };
    let mut emitter = Emitter::new(size_limit);
    for (idx, ast::Token { offset, item }) in tokens.into_iter().enumerate() {
        emitter.emit(offset, item, Some(idx) == last)?;
    }

    match unparsed {
        Some(e) => Err(e),
        None => emitter.finish(anchored),
    }
}

fn consume(value: u8) -> Opcode {
    Opcode::Atom(Atom::Consume(InstConsume::new(value)))
}

struct Emitter {
    size_limit: usize,
    size: usize,
    opcodes: Vec<Opcode>,
    /// The step a following `*` applies to. A `*` emitted as a literal never
    /// becomes a repetition target.
    repeat_target: Option<usize>,
    /// Slot and pattern offset of each group still open.
    open_groups: Vec<(usize, usize)>,
    next_slot: usize,
    closed_groups: usize,
}

impl Emitter {
    fn new(size_limit: usize) -> Self {
        Self {
            size_limit,
            size: 0,
            opcodes: vec![],
            repeat_target: None,
            open_groups: vec![],
            next_slot: 0,
            closed_groups: 0,
        }
    }

    fn emit(
        &mut self,
        offset: usize,
        item: ast::ExpressionItem,
        is_last: bool,
    ) -> Result<(), CompileError> {
        use ast::ExpressionItem;

        let opcode = match item {
            ExpressionItem::Star => return self.repeat_previous(),
            ExpressionItem::Char(ast::Char(c)) => consume(c),
            ExpressionItem::AnyCharacter => Opcode::Atom(Atom::Any),
            ExpressionItem::EndOfLine if is_last => Opcode::EndOfLine,
            ExpressionItem::EndOfLine => consume(b'$'),
            ExpressionItem::BracketExpression(expression) => {
                let set = class::build(offset, expression)?;
                Opcode::Atom(Atom::ConsumeSet(InstConsumeSet::new(set)))
            }
            ExpressionItem::GroupOpen => {
                Opcode::StartSave(InstStartSave::new(self.open_group(offset)?))
            }
            ExpressionItem::GroupClose => {
                Opcode::EndSave(InstEndSave::new(self.close_group(offset)?))
            }
            ExpressionItem::Backreference(ast::Backreference(group)) => {
                let slot_id = self.backreference(offset, group)?;
                Opcode::Atom(Atom::Backreference(InstBackreference::new(slot_id)))
            }
        };

        let idx = self.push(opcode)?;
        self.repeat_target = Some(idx);
        Ok(())
    }

    fn push(&mut self, opcode: Opcode) -> Result<usize, CompileError> {
        self.size += opcode.size();
        if self.size > self.size_limit {
            return Err(CompileError::ProgramTooLarge {
                limit: self.size_limit,
            });
        }

        self.opcodes.push(opcode);
        Ok(self.opcodes.len() - 1)
    }

    fn repeat_previous(&mut self) -> Result<(), CompileError> {
        match self.repeat_target.map(|idx| (idx, &self.opcodes[idx])) {
            Some((idx, Opcode::Atom(atom))) => {
                self.opcodes[idx] = Opcode::Repeat(atom.clone());
                Ok(())
            }
            // a repeated step stays repeated.
            Some((_, Opcode::Repeat(_))) => Ok(()),
            // nothing repeatable precedes the star, so it is a literal.
            _ => self.push(consume(b'*')).map(|_| ()),
        }
    }

    fn open_group(&mut self, offset: usize) -> Result<usize, CompileError> {
        if self.next_slot >= MAX_GROUPS {
            return Err(CompileError::TooManyGroups { offset });
        }

        let slot_id = self.next_slot;
        self.next_slot += 1;
        self.open_groups.push((slot_id, offset));
        Ok(slot_id)
    }

    fn close_group(&mut self, offset: usize) -> Result<usize, CompileError> {
        let (slot_id, _) = self
            .open_groups
            .pop()
            .ok_or(CompileError::UnmatchedGroupClose { offset })?;

        self.closed_groups += 1;
        Ok(slot_id)
    }

    /// Resolves `\n` to a slot. Only as many groups as have been closed so far
    /// may be referenced, counted in the order they were closed.
    fn backreference(&self, offset: usize, group: u8) -> Result<usize, CompileError> {
        usize::from(group)
            .checked_sub(1)
            .filter(|&slot_id| slot_id < self.closed_groups)
            .ok_or(CompileError::InvalidBackreference { offset, group })
    }

    fn finish(mut self, anchored: bool) -> Result<Instructions, CompileError> {
        if let Some(&(_, offset)) = self.open_groups.last() {
            return Err(CompileError::UnterminatedGroup { offset });
        }

        self.push(Opcode::Match)?;

        let fast_forward = match self.opcodes.first() {
            Some(Opcode::Atom(Atom::Consume(inst))) if !anchored => {
                FastForward::Char(inst.value())
            }
            _ => FastForward::None,
        };

        Ok(Instructions::new(self.opcodes)
            .with_anchor(anchored)
            .with_fast_forward(fast_forward))
    }
}
