use crate::test_case::TestCase;
use crate::test_result::{TestResult, ValueComparison};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{ChildStdin, Command, Stdio};
use std::thread;
use tracing::{debug, warn};

/// The shell used to interpret test commands
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shell {
    program: PathBuf,
    flag: String,
}

impl Shell {
    /// The platform's default shell: `sh -c` on Unix, `cmd /C` on Windows
    pub fn system() -> Shell {
        if cfg!(windows) {
            Shell {
                program: PathBuf::from("cmd"),
                flag: String::from("/C"),
            }
        } else {
            Self::new("sh")
        }
    }

    /// A POSIX-style shell that accepts the command after `-c`
    pub fn new<P>(program: P) -> Shell
    where
        P: Into<PathBuf>,
    {
        Shell {
            program: program.into(),
            flag: String::from("-c"),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn with_program<P>(self, program: P) -> Shell
    where
        P: Into<PathBuf>,
    {
        Shell {
            program: program.into(),
            ..self
        }
    }

    fn command(&self, command: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(&self.flag);
        cmd.arg(command);
        cmd
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::system()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("failed to start `{program}`: {source}")]
    FailedToSpawn { program: String, source: io::Error },

    #[error("failed to write to standard input: {0}")]
    FailedToWriteStdin(io::Error),

    #[error("failed to collect output: {0}")]
    FailedToCollectOutput(io::Error),
}

/// Run the command of a test case and compare its standard output
///
/// The exit code is recorded but never decides the outcome.
pub fn run(test_case: &TestCase, shell: &Shell) -> Result<TestResult, RunError> {
    debug!(command = %test_case.command, "running test case");

    let mut cmd = shell.command(&test_case.command);
    cmd.stdin(Stdio::piped());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|source| {
        warn!(program = %shell.program.display(), %source, "failed to spawn shell");
        RunError::FailedToSpawn {
            program: shell.program.display().to_string(),
            source,
        }
    })?;

    let stdin = child.stdin.take();

    // Input is written from a separate thread so that a command producing a
    // lot of output cannot block on a full stdout pipe while we write.
    let (written, output) = thread::scope(|scope| {
        let writer = scope.spawn(|| write_stdin(stdin, test_case.input.as_bytes()));
        let output = child.wait_with_output();
        let written = writer
            .join()
            .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "writer panicked")));
        (written, output)
    });

    let output = output.map_err(RunError::FailedToCollectOutput)?;
    written.map_err(RunError::FailedToWriteStdin)?;

    debug!(
        command = %test_case.command,
        exit_code = ?output.status.code(),
        "test case finished"
    );

    Ok(TestResult {
        stdout: ValueComparison::compare(test_case.output.as_bytes().to_vec(), output.stdout),
        stderr: output.stderr,
        exit_code: output.status.code(),
    })
}

fn write_stdin(stdin: Option<ChildStdin>, input: &[u8]) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };

    // Commands are free to exit without reading their input
    match stdin.write_all(input) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn test_case(command: &str, input: &str, output: &str) -> TestCase {
        TestCase::new(command)
            .append_input(input)
            .append_output(output)
    }

    #[test]
    fn test_cat_echoes_input() {
        let result = run(&test_case("cat", "hello\n", "hello\n"), &Shell::system()).unwrap();

        assert!(result.is_success());
        assert_eq!(result.exit_code, Some(0));
    }

    #[test]
    fn test_mismatch_keeps_captured_stdout() {
        let result = run(&test_case("echo wrong", "", "right"), &Shell::system()).unwrap();

        assert_eq!(result.is_success(), false);
        match result.stdout {
            ValueComparison::Diff { expected, got } => {
                assert_eq!(expected, b"right");
                assert_eq!(got, b"wrong\n");
            }
            ValueComparison::Matches(_) => panic!("expected a diff"),
        }
    }

    #[test]
    fn test_exit_code_does_not_decide() {
        let result = run(&test_case("echo hi; exit 3", "", "hi\n"), &Shell::system()).unwrap();

        assert!(result.is_success());
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn test_stderr_is_captured_separately() {
        let result = run(&test_case("echo oops >&2", "", ""), &Shell::system()).unwrap();

        assert!(result.is_success());
        assert_eq!(result.stderr, b"oops\n");
    }

    #[test]
    fn test_command_ignoring_large_input() {
        let input = "x".repeat(1 << 20);
        let result = run(&test_case("true", &input, ""), &Shell::system()).unwrap();

        assert!(result.is_success());
    }

    #[test]
    fn test_large_output_does_not_block() {
        let input = "line\n".repeat(100_000);
        let result = run(&test_case("cat", &input, &input), &Shell::system()).unwrap();

        assert!(result.is_success());
    }

    #[test]
    fn test_missing_shell() {
        let shell = Shell::new("/nonexistent/shell");
        let result = run(&test_case("true", "", ""), &shell);

        assert!(matches!(result, Err(RunError::FailedToSpawn { .. })));
    }
}
