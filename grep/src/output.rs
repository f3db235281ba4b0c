//! Line selection and reporting for a single input.

use std::io::{BufRead, Write};

use anyhow::Context;
use bre_runtime::{Instructions, Limits};

/// Size of the blocks reported by block numbers.
pub const BLOCK_SIZE: u64 = 512;

/// Controls which lines are selected and how they are reported.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    pub invert: bool,
    pub count: bool,
    pub list_files: bool,
    pub line_numbers: bool,
    pub block_numbers: bool,
    pub silent: bool,
    /// Prefix selected lines with the input's name.
    pub with_filename: bool,
    /// Prefix counts with the input's name.
    pub count_with_filename: bool,
}

pub struct Reporter<'p> {
    program: &'p Instructions,
    limits: Limits,
    config: ReportConfig,
}

impl<'p> Reporter<'p> {
    pub fn new(program: &'p Instructions, limits: Limits, config: ReportConfig) -> Self {
        Self {
            program,
            limits,
            config,
        }
    }

    /// Searches every line of `input`, writing selected lines to `out`.
    /// Returns whether any line was selected.
    pub fn report<R: BufRead, W: Write>(
        &self,
        name: &str,
        mut input: R,
        out: &mut W,
    ) -> anyhow::Result<bool> {
        let config = self.config;
        let mut line = Vec::new();
        let mut line_number: u64 = 0;
        let mut offset: u64 = 0;
        let mut selected: u64 = 0;

        loop {
            line.clear();
            let read = input
                .read_until(b'\n', &mut line)
                .with_context(|| format!("can't read {}", name))?;
            if read == 0 {
                break;
            }

            line_number += 1;
            if line.last() == Some(&b'\n') {
                line.pop();
            }
            // offset of the terminator, real or not, ending this line.
            let terminator = offset + line.len() as u64;
            offset += read as u64;

            let matched = bre_runtime::search_with_limits(self.program, &line, self.limits)
                .with_context(|| format!("{}: line {}", name, line_number))?
                .is_some();
            if matched == config.invert {
                continue;
            }

            selected += 1;
            if config.silent || config.count {
                continue;
            }

            if config.list_files {
                writeln!(out, "{}", name)?;
                break;
            }

            if config.with_filename {
                write!(out, "{}:", name)?;
            }
            if config.block_numbers {
                write!(out, "{}:", terminator / BLOCK_SIZE)?;
            }
            if config.line_numbers {
                write!(out, "{}:", line_number)?;
            }
            out.write_all(&line)?;
            out.write_all(b"\n")?;
        }

        if config.count && !config.silent {
            if config.count_with_filename {
                write!(out, "{}:", name)?;
            }
            writeln!(out, "{}", selected)?;
        }

        log::debug!("{}: {} of {} lines selected", name, selected, line_number);

        Ok(selected > 0)
    }
}
