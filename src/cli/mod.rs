pub mod error;

use clap::Parser;
use error::CliError;
use shtester::executor::Shell;
use shtester::test_runner::{ReportFormat, DEFAULT_NUM_PROCS};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

pub fn parse() -> Args {
    Args::parse()
}

/// Run shell commands from a test file and compare their output
#[derive(Parser)]
#[clap(bin_name = "shtester")]
pub struct Args {
    /// Path to test file, or `-` to read from stdin
    pub file: PathBuf,

    /// Number of tests to run at the same time
    #[arg(short = 'j', long, default_value_t = default_num_procs())]
    pub num_procs: NonZeroUsize,

    /// Options: summary, tap
    #[arg(long, default_value = "summary")]
    pub output_format: OutputFormat,

    /// Shell used to run test commands (invoked as `<SHELL> -c <COMMAND>`)
    #[arg(long, env = "SHTESTER_SHELL")]
    pub shell: Option<String>,
}

fn default_num_procs() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_NUM_PROCS).unwrap_or(NonZeroUsize::MIN)
}

#[derive(Clone, Copy)]
pub enum OutputFormat {
    Summary,
    Tap,
}

impl FromStr for OutputFormat {
    type Err = &'static str;

    fn from_str(format: &str) -> Result<Self, Self::Err> {
        match format {
            "summary" => Ok(Self::Summary),
            "tap" => Ok(Self::Tap),
            _ => Err("Invalid output format"),
        }
    }
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Summary => ReportFormat::Summary,
            OutputFormat::Tap => ReportFormat::Tap,
        }
    }
}

/// Pick the shell and make sure it can be found before any test runs
pub fn resolve_shell(program: Option<&str>) -> Result<Shell, CliError> {
    let shell = program.map_or_else(Shell::system, Shell::new);

    let path = which::which(shell.program()).map_err(|source| CliError::ShellNotFound {
        program: shell.program().display().to_string(),
        source,
    })?;

    Ok(shell.with_program(path))
}
