//! Test Anything Protocol output
//!
//! Results are written as they complete. Test points are numbered in that
//! order; the position of the test in the file is part of the description.

use crate::utils::string;
use std::io::{self, Write};

pub fn write_version(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "TAP version 14")
}

pub fn write_plan(w: &mut dyn Write, start: usize, end: usize) -> io::Result<()> {
    writeln!(w, "{}..{}", start, end)
}

pub fn write_ok(w: &mut dyn Write, test_number: usize, message: &str) -> io::Result<()> {
    writeln!(w, "ok {} - {}", test_number, message)
}

pub fn write_not_ok(
    w: &mut dyn Write,
    test_number: usize,
    message: &str,
    diagnostics: &str,
) -> io::Result<()> {
    writeln!(w, "not ok {} - {}", test_number, message)?;
    if !diagnostics.is_empty() {
        write_diagnostics(w, diagnostics)?;
    }
    Ok(())
}

/// Write a YAML block; `diagnostics` should end with a newline
pub fn write_diagnostics(w: &mut dyn Write, diagnostics: &str) -> io::Result<()> {
    let block = format!("---\n{}...\n", diagnostics);
    write!(w, "{}", string::indent_lines(&block, 2))
}

/// Line diff between expected and actual output, as YAML block scalar lines
pub fn diff_lines(expected: &str, got: &str) -> String {
    let mut output = String::new();

    for line in diff::lines(expected, got) {
        let (sign, content) = match line {
            diff::Result::Left(l) => ('-', l),
            diff::Result::Both(l, _) => (' ', l),
            diff::Result::Right(r) => ('+', r),
        };
        output.push(sign);
        output.push_str(content);
        output.push('\n');
    }

    output
}
