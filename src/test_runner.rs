use crate::executor::{self, RunError, Shell};
use crate::formats::{summary, tap};
use crate::test_case::TestCase;
use crate::test_result::TestResult;
use rayon::{ThreadPoolBuildError, ThreadPoolBuilder};
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::sync::mpsc;
use tracing::{info, warn};

pub const DEFAULT_NUM_PROCS: usize = 50;

pub struct ReportConfig {
    pub number_of_tests: usize,
    pub format: ReportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Summary,
    Tap,
}

pub struct RunResult {
    pub test_case: TestCase,
    pub result: Result<TestResult, RunError>,
}

impl RunResult {
    pub fn is_success(&self) -> bool {
        match &self.result {
            Ok(test_result) => test_result.is_success(),
            Err(_) => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

// RUN TEST CASES

/// Run all test cases and report each result to stdout as it completes
pub fn run_test_cases(
    report_config: &ReportConfig,
    test_cases: Vec<TestCase>,
    num_procs: NonZeroUsize,
    shell: &Shell,
) -> Result<RunSummary, ThreadPoolBuildError> {
    report_start(report_config);

    let mut reported = 0;
    let summary = execute(test_cases, num_procs, shell, |index, run_result| {
        reported += 1;
        report_test_case(report_config, reported, index, run_result);
    })?;

    report_summary(report_config, &summary);

    info!(
        total = summary.total,
        failed = summary.failed,
        "finished running tests"
    );

    Ok(summary)
}

/// Run test cases on a pool of `num_procs` workers
///
/// `on_result` is called on the calling thread, once per test case, in
/// completion order. It receives the index of the test case in `test_cases`.
pub fn execute<F>(
    test_cases: Vec<TestCase>,
    num_procs: NonZeroUsize,
    shell: &Shell,
    mut on_result: F,
) -> Result<RunSummary, ThreadPoolBuildError>
where
    F: FnMut(usize, &RunResult),
{
    let pool = ThreadPoolBuilder::new()
        .num_threads(num_procs.get())
        .thread_name(|i| format!("shtester-worker-{}", i))
        .build()?;

    let total = test_cases.len();
    let mut failed = 0;

    let (sender, receiver) = mpsc::channel();

    pool.in_place_scope(|scope| {
        for (index, test_case) in test_cases.into_iter().enumerate() {
            let sender = sender.clone();
            scope.spawn(move |_| {
                let result = executor::run(&test_case, shell);
                // The receiver outlives every worker
                let _ = sender.send((index, RunResult { test_case, result }));
            });
        }
        drop(sender);

        for (index, run_result) in receiver {
            if !run_result.is_success() {
                failed += 1;
            }
            on_result(index, &run_result);
        }
    });

    Ok(RunSummary { total, failed })
}

// REPORTING

fn report_start(report_config: &ReportConfig) {
    match report_config.format {
        ReportFormat::Summary => {}
        ReportFormat::Tap => {
            report_io(|w| {
                tap::write_version(w)?;
                tap::write_plan(w, 1, report_config.number_of_tests)
            });
        }
    }
}

fn report_test_case(
    report_config: &ReportConfig,
    test_number: usize,
    index: usize,
    run_result: &RunResult,
) {
    match report_config.format {
        ReportFormat::Summary => {
            if !run_result.is_success() {
                report_io(|w| summary::write_failure(w, run_result));
            }
        }
        ReportFormat::Tap => {
            report_io(|w| tap_write_test_case(w, test_number, index, run_result));
        }
    }
}

fn report_summary(report_config: &ReportConfig, run_summary: &RunSummary) {
    match report_config.format {
        ReportFormat::Summary => {
            report_io(|w| summary::write_summary(w, run_summary));
        }
        ReportFormat::Tap => {}
    }
}

fn report_io<F>(f: F)
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    if let Err(err) = f(&mut lock).and_then(|()| lock.flush()) {
        warn!(%err, "failed to write report");
    }
}

// TAP HELPERS

// Test points are numbered in the order they are reported, which is the order
// TAP consumers require. The position in the file goes in the description.
fn tap_write_test_case(
    w: &mut dyn Write,
    test_number: usize,
    index: usize,
    run_result: &RunResult,
) -> io::Result<()> {
    let message = format!("test {}: $ {}", index + 1, run_result.test_case.command);

    match &run_result.result {
        Ok(test_result) if test_result.is_success() => tap::write_ok(w, test_number, &message),
        Ok(test_result) => {
            let expected = &run_result.test_case.output;
            let got = String::from_utf8_lossy(test_result.stdout.got());
            let diff = string_block(&tap::diff_lines(expected, &got));
            let mut diagnostics = format!("stdout: |{}\n{}", BLOCK_INDENT, diff);
            if let Some(exit_code) = test_result.exit_code {
                diagnostics.push_str(&format!("exit_code: {}\n", exit_code));
            }
            tap::write_not_ok(w, test_number, &message, &diagnostics)
        }
        Err(err) => {
            let block = string_block(&format!("{}\n", err));
            let diagnostics = format!("error: |{}\n{}", BLOCK_INDENT, block);
            tap::write_not_ok(w, test_number, &message, &diagnostics)
        }
    }
}

// Diff lines may start with a space, so block scalars state their indentation
const BLOCK_INDENT: usize = 2;

fn string_block(content: &str) -> String {
    crate::utils::string::indent_lines(content, BLOCK_INDENT)
}
