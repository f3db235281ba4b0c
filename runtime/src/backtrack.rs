//! A backtracking interpreter over a compiled program.
//!
//! Straight-line steps are evaluated in a loop. A repeated atom pushes a
//! retry frame recording every run length it may still give back, and a
//! failure resumes from the innermost frame with a pending run. Frames live on
//! the heap, so the depth of nested repetition never grows the call stack.

use crate::{Atom, Captures, ExecutionError, Instruction, Limits, Match, Opcode};

/// The pending run lengths of a repeated atom.
struct Retry {
    /// Index of the step following the repetition.
    pc: usize,
    start: usize,
    width: usize,
    /// Runs not yet attempted. The next candidate is `remaining - 1` units.
    remaining: usize,
    /// A literal the remaining program must begin with.
    next_literal: Option<u8>,
    checkpoint: Captures,
}

pub(crate) struct Machine<'p, 't> {
    program: &'p [Instruction],
    line: &'t [u8],
    captures: Captures,
    limits: Limits,
    steps: u64,
    retries: Vec<Retry>,
}

impl<'p, 't> Machine<'p, 't> {
    pub(crate) fn new(program: &'p [Instruction], line: &'t [u8], limits: Limits) -> Self {
        Self {
            program,
            line,
            captures: Captures::default(),
            limits,
            steps: 0,
            retries: Vec::new(),
        }
    }

    /// Attempts to match the whole program starting at `start`. Captures are
    /// reset for every attempt, while the step budget is shared across all
    /// attempts on the machine.
    pub(crate) fn attempt(&mut self, start: usize) -> Result<Option<Match>, ExecutionError> {
        self.captures = Captures::default();
        self.retries.clear();

        let mut next = Some((start, 0));
        while let Some((sp, pc)) = next {
            if let Some(end) = self.run_from(sp, pc)? {
                return Ok(Some(Match::new(start, end, self.captures)));
            }

            next = self.backtrack()?;
        }

        Ok(None)
    }

    /// Runs the program from `pc` against the line from `sp`, returning the
    /// offset at which `Match` was reached. A repeated atom ends the run after
    /// pushing its retry frame, leaving [Machine::backtrack] to pick the first
    /// run length to continue with.
    fn run_from(&mut self, mut sp: usize, mut pc: usize) -> Result<Option<usize>, ExecutionError> {
        let program = self.program;

        loop {
            self.tick()?;
            let inst = program
                .get(pc)
                .ok_or(ExecutionError::MalformedProgram { pc })?;
            pc += 1;

            match inst.opcode() {
                Opcode::Atom(atom) => match self.consume(atom, sp) {
                    Some(next) => sp = next,
                    None => return Ok(None),
                },
                Opcode::Repeat(atom) => match self.width(atom) {
                    // an empty capture repeats without consuming anything.
                    Some(0) => continue,
                    Some(width) => {
                        self.push_retry(atom, width, sp, pc)?;
                        return Ok(None);
                    }
                    None => return Ok(None),
                },
                Opcode::StartSave(inst) => self.captures.open(inst.slot_id(), sp),
                Opcode::EndSave(inst) => self.captures.close(inst.slot_id(), sp),
                Opcode::EndOfLine if sp == self.line.len() => continue,
                Opcode::EndOfLine => return Ok(None),
                Opcode::Match => return Ok(Some(sp)),
            }
        }
    }

    /// Consumes a single unit of an atom at `sp`, returning the offset
    /// following it.
    fn consume(&self, atom: &Atom, sp: usize) -> Option<usize> {
        let line = self.line;

        match atom {
            Atom::Consume(inst) => (line.get(sp) == Some(&inst.value())).then_some(sp + 1),
            Atom::Any => (sp < line.len()).then_some(sp + 1),
            Atom::ConsumeSet(inst) => line
                .get(sp)
                .filter(|&&c| inst.set().in_set(c))
                .map(|_| sp + 1),
            Atom::Backreference(inst) => {
                let captured = line.get(self.captures.span(inst.slot_id())?)?;
                let end = sp + captured.len();

                (line.get(sp..end)? == captured).then_some(end)
            }
        }
    }

    /// The number of bytes in one unit of the atom, or `None` for a
    /// backreference to a group that has not been closed.
    fn width(&self, atom: &Atom) -> Option<usize> {
        match atom {
            Atom::Backreference(inst) => self.captures.span(inst.slot_id()).map(|span| span.len()),
            _ => Some(1),
        }
    }

    /// Greedily consumes as many units of the atom as possible and records
    /// every run length, longest first, as a candidate to continue from.
    fn push_retry(
        &mut self,
        atom: &Atom,
        width: usize,
        start: usize,
        pc: usize,
    ) -> Result<(), ExecutionError> {
        if self.retries.len() >= self.limits.max_depth {
            return Err(ExecutionError::DepthLimitExceeded {
                limit: self.limits.max_depth,
            });
        }

        let mut units = 0;
        let mut end = start;
        while let Some(next) = self.consume(atom, end) {
            end = next;
            units += 1;
        }

        // a following literal rules out any run not ending on that literal.
        let next_literal = match self.program.get(pc).map(Instruction::opcode) {
            Some(Opcode::Atom(Atom::Consume(inst))) => Some(inst.value()),
            _ => None,
        };

        self.retries.push(Retry {
            pc,
            start,
            width,
            remaining: units + 1,
            next_literal,
            checkpoint: self.captures,
        });
        Ok(())
    }

    /// Returns the next position to resume from, taken from the innermost
    /// repetition with a run left to try. Captures are restored to their state
    /// before that repetition.
    fn backtrack(&mut self) -> Result<Option<(usize, usize)>, ExecutionError> {
        while let Some(retry) = self.retries.last_mut() {
            while retry.remaining > 0 {
                retry.remaining -= 1;

                let sp = retry.start + retry.remaining * retry.width;
                if retry
                    .next_literal
                    .map_or(false, |c| self.line.get(sp) != Some(&c))
                {
                    continue;
                }

                let pc = retry.pc;
                self.captures = retry.checkpoint;
                self.tick()?;
                return Ok(Some((sp, pc)));
            }

            self.captures = retry.checkpoint;
            self.retries.pop();
        }

        Ok(None)
    }

    fn tick(&mut self) -> Result<(), ExecutionError> {
        self.steps += 1;

        match self.limits.max_steps {
            Some(limit) if self.steps > limit => Err(ExecutionError::StepLimitExceeded { limit }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;

    #[test]
    fn should_restore_captures_between_retries() {
        // ^\(a*\)\(b\)c, the second group is recorded on a retry that fails
        // and must not survive into the retry that succeeds.
        let prog = Instructions::new(vec![
            Opcode::StartSave(InstStartSave::new(0)),
            Opcode::Repeat(Atom::Consume(InstConsume::new(b'a'))),
            Opcode::EndSave(InstEndSave::new(0)),
            Opcode::StartSave(InstStartSave::new(1)),
            Opcode::Atom(Atom::Consume(InstConsume::new(b'b'))),
            Opcode::EndSave(InstEndSave::new(1)),
            Opcode::Atom(Atom::Consume(InstConsume::new(b'c'))),
            Opcode::Match,
        ]);
        let mut machine = Machine::new(prog.as_ref(), b"aabd", Limits::default());

        assert_eq!(Ok(None), machine.attempt(0));
        // every retry restored the table to its state before the repetition.
        assert_eq!(SaveGroupSlot::open(0), machine.captures.get(0));
        assert_eq!(SaveGroupSlot::None, machine.captures.get(1));
    }

    #[test]
    fn should_share_step_budget_across_attempts() {
        // ab
        let prog = Instructions::new(vec![
            Opcode::Atom(Atom::Consume(InstConsume::new(b'a'))),
            Opcode::Atom(Atom::Consume(InstConsume::new(b'b'))),
            Opcode::Match,
        ]);
        let limits = Limits::default().with_max_steps(3);
        let mut machine = Machine::new(prog.as_ref(), b"xxab", limits);

        // each attempt failing on its first byte costs a single step.
        assert_eq!(Ok(None), machine.attempt(0));
        assert_eq!(Ok(None), machine.attempt(1));
        assert_eq!(
            Err(ExecutionError::StepLimitExceeded { limit: 3 }),
            machine.attempt(2)
        );
    }

    #[test]
    fn should_report_end_of_match() {
        // a.*
        let prog = Instructions::new(vec![
            Opcode::Atom(Atom::Consume(InstConsume::new(b'a'))),
            Opcode::Repeat(Atom::Any),
            Opcode::Match,
        ]);
        let mut machine = Machine::new(prog.as_ref(), b"xabc", Limits::default());

        assert_eq!(Some(1..4), machine.attempt(1).unwrap().map(|m| m.range()));
        assert_eq!(Ok(None), machine.attempt(0));
    }
}
