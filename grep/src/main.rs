mod fold;
mod logging;
mod output;

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use bre_runtime::Limits;
use clap::Parser;

use output::{ReportConfig, Reporter};

/// Name reported for standard input.
const STDIN_NAME: &str = "(standard input)";

/// Search files for lines matching a basic regular expression.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, disable_help_flag = true)]
struct Options {
    /// Select lines that do not match
    #[arg(short = 'v')]
    invert_match: bool,

    /// Print only a count of selected lines per file
    #[arg(short = 'c')]
    count: bool,

    /// Print only the names of files with selected lines
    #[arg(short = 'l')]
    files_with_matches: bool,

    /// Prefix each line with its line number
    #[arg(short = 'n')]
    line_number: bool,

    /// Prefix each line with the block number of its end
    #[arg(short = 'b')]
    block_number: bool,

    /// Print nothing, report only through the exit status
    #[arg(short = 's')]
    silent: bool,

    /// Never prefix lines with file names
    #[arg(short = 'h')]
    no_filename: bool,

    /// Match lowercase letters in the pattern without regard to case
    #[arg(short = 'y')]
    ignore_case: bool,

    /// Use PATTERN as the pattern, even if it begins with `-`
    #[arg(short = 'e', value_name = "PATTERN", allow_hyphen_values = true)]
    regexp: Option<OsString>,

    /// Log at debug level and dump the compiled program
    #[arg(long)]
    debug: bool,

    /// Abort when searching a line takes more than N steps
    #[arg(long, value_name = "N")]
    max_steps: Option<u64>,

    /// Print help
    #[arg(long, action = clap::ArgAction::Help)]
    help: Option<bool>,

    /// The pattern, unless given with -e, followed by the files to search
    #[arg(value_name = "ARGS")]
    args: Vec<OsString>,
}

impl Options {
    /// Splits the positional arguments into the pattern and the files to
    /// search.
    fn pattern_and_files(&self) -> anyhow::Result<(Vec<u8>, Vec<PathBuf>)> {
        let mut args = self.args.iter().cloned();
        let pattern = self
            .regexp
            .clone()
            .or_else(|| args.next())
            .ok_or_else(|| anyhow!("no pattern given"))?;

        Ok((pattern.into_encoded_bytes(), args.map(PathBuf::from).collect()))
    }

    fn limits(&self) -> Limits {
        match self.max_steps {
            Some(max_steps) => Limits::default().with_max_steps(max_steps),
            None => Limits::default(),
        }
    }

    fn report_config(&self, file_cnt: usize) -> ReportConfig {
        ReportConfig {
            invert: self.invert_match,
            count: self.count,
            list_files: self.files_with_matches,
            line_numbers: self.line_number,
            block_numbers: self.block_number,
            silent: self.silent,
            with_filename: file_cnt > 1 && !self.no_filename,
            count_with_filename: file_cnt > 1,
        }
    }
}

/// Returns whether any line was selected.
fn run(options: &Options) -> anyhow::Result<bool> {
    let (pattern, files) = options.pattern_and_files()?;
    let pattern = match options.ignore_case {
        true => fold::fold_case(&pattern),
        false => pattern,
    };

    let program = bre_compiler::compile(&pattern).context("RE error")?;
    log::debug!("compiled program:\n{}", program);

    // there is nothing to list for standard input.
    if files.is_empty() && options.files_with_matches {
        return Ok(false);
    }

    let config = options.report_config(files.len());
    let reporter = Reporter::new(&program, options.limits(), config);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut selected = false;
    if files.is_empty() {
        selected = reporter.report(STDIN_NAME, io::stdin().lock(), &mut out)?;
    } else {
        for path in files {
            let file =
                File::open(&path).with_context(|| format!("can't open {}", path.display()))?;
            let name = path.display().to_string();

            selected |= reporter.report(&name, BufReader::new(file), &mut out)?;
        }
    }

    out.flush()?;
    Ok(selected)
}

fn main() {
    let options = Options::parse();

    if let Err(e) = logging::setup(options.debug) {
        eprintln!("bgrep: unable to initialize logging: {:#}", e);
    }

    let status = match run(&options) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            eprintln!("bgrep: {:#}", e);
            2
        }
    };

    std::process::exit(status)
}
