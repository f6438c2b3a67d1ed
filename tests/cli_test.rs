#![cfg(unix)]

use indoc::indoc;
use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_shtester(args: &[&str], test_file: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_shtester"))
        .args(args)
        .arg("-")
        .env("CLICOLOR", "0")
        .env_remove("SHTESTER_SHELL")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(test_file.as_bytes())
        .unwrap();

    child.wait_with_output().unwrap()
}

const PASSING: &str = indoc! {"
    $ cat
    <<<
    hello
    <<<
    >>>
    hello
    >>>
"};

const MIXED: &str = indoc! {"
    $ cat
    <<<
    hi
    <<<
    >>>
    hi
    >>>

    NB. prints the wrong thing
    $ echo wrong
    <<<
    <<<
    >>>
    right
    >>>
"};

#[test]
fn test_all_tests_pass() {
    let output = run_shtester(&[], PASSING);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("ALL 1 TESTS SUCCEEDED"));
    assert_eq!(stdout.contains("TEST FAILED"), false);
}

#[test]
fn test_failed_tests_are_reported() {
    let output = run_shtester(&["-j", "2"], MIXED);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout.matches("TEST FAILED").count(), 1);
    assert!(stdout.contains("$ echo wrong\n<<<\n<<<\n>>>\nright\n>>>\n"));
    assert!(stdout.contains("SCRIPT OUTPUTTED:\nwrong\n"));
    assert!(stdout.contains("FAILED 1 TESTS OUT OF 2"));
}

#[test]
fn test_tap_output() {
    let output = run_shtester(&["--output-format", "tap", "-j", "2"], MIXED);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.starts_with("TAP version 14\n1..2\n"));

    let points = stdout
        .lines()
        .filter(|line| line.starts_with("ok ") || line.starts_with("not ok "))
        .collect::<Vec<_>>();

    assert_eq!(points.len(), 2);
    assert!(
        points.contains(&"ok 1 - test 1: $ cat") || points.contains(&"ok 2 - test 1: $ cat")
    );
    assert!(
        points.contains(&"not ok 1 - test 2: $ echo wrong")
            || points.contains(&"not ok 2 - test 2: $ echo wrong")
    );

    // Points are numbered in the order they are printed
    assert!(points[0].contains(" 1 - "));
    assert!(points[1].contains(" 2 - "));
}

#[test]
fn test_parse_error_runs_nothing() {
    let test_file = indoc! {"
        $ touch should-not-exist
        <<<
        <<<
        >>>
        >>>
        oops
    "};

    let output = run_shtester(&[], test_file);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(stderr.contains("line 6: expected a line starting with $, or a comment. got oops"));
}

#[test]
fn test_unterminated_test_is_an_error() {
    let output = run_shtester(&[], "$ cat\n<<<\nhello\n");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("unexpected end of file while expecting end-input for test `cat`"));
}

#[test]
fn test_unknown_shell_is_an_error() {
    let output = run_shtester(&["--shell", "no-such-shell-for-shtester"], PASSING);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("no-such-shell-for-shtester"));
}
