mod cli;

use cli::error::CliError;
use colored::Colorize;
use shtester::test_file;
use shtester::test_runner::{self, ReportConfig, RunSummary};
use std::process::ExitCode;
use tracing::info;

fn main() -> ExitCode {
    // Logs go to stderr so they never interleave with the report on stdout
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let args = cli::parse();

    match run(args) {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::from(2)
        }
    }
}

fn run(args: cli::Args) -> Result<RunSummary, CliError> {
    let test_cases =
        test_file::read_file(&args.file).map_err(|source| CliError::FailedToReadTestFile {
            path: args.file.display().to_string(),
            source,
        })?;

    let shell = cli::resolve_shell(args.shell.as_deref())?;

    info!(
        count = test_cases.len(),
        num_procs = args.num_procs.get(),
        shell = %shell.program().display(),
        "running tests"
    );

    let report_config = ReportConfig {
        number_of_tests: test_cases.len(),
        format: args.output_format.into(),
    };

    let summary = test_runner::run_test_cases(&report_config, test_cases, args.num_procs, &shell)?;

    Ok(summary)
}
