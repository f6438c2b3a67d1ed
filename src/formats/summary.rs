use crate::test_runner::{RunResult, RunSummary};
use colored::Colorize;
use std::io::{self, Write};

/// Write the details of a failed test: its rendering and what the command printed
pub fn write_failure(w: &mut dyn Write, run_result: &RunResult) -> io::Result<()> {
    writeln!(w, "{}", "TEST FAILED".red().bold())?;
    writeln!(w, "{}", run_result.test_case.pretty())?;

    match &run_result.result {
        Ok(test_result) => {
            writeln!(w, "{}", "SCRIPT OUTPUTTED:".yellow())?;
            writeln!(w, "{}", String::from_utf8_lossy(test_result.stdout.got()))?;

            if !test_result.stderr.is_empty() {
                writeln!(w, "{}", "SCRIPT STDERR:".yellow())?;
                writeln!(w, "{}", String::from_utf8_lossy(&test_result.stderr))?;
            }
        }
        Err(err) => {
            writeln!(w, "{}", "FAILED TO RUN TEST:".yellow())?;
            writeln!(w, "{}", err)?;
        }
    }

    Ok(())
}

pub fn write_summary(w: &mut dyn Write, summary: &RunSummary) -> io::Result<()> {
    if summary.is_success() {
        let line = format!("ALL {} TESTS SUCCEEDED", summary.total);
        writeln!(w, "{}", line.green().bold())
    } else {
        let line = format!("FAILED {} TESTS OUT OF {}", summary.failed, summary.total);
        writeln!(w, "{}", line.red().bold())
    }
}
