use std::fmt::{Display, Formatter};

/// A shell command together with the text fed to it and the text it must print
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    pub command: String,
    pub input: String,
    pub output: String,
}

impl TestCase {
    pub fn new<S>(command: S) -> TestCase
    where
        S: Into<String>,
    {
        TestCase {
            command: command.into(),
            input: String::new(),
            output: String::new(),
        }
    }

    pub fn append_input(mut self, line: &str) -> TestCase {
        self.input.push_str(line);
        self
    }

    pub fn append_output(mut self, line: &str) -> TestCase {
        self.output.push_str(line);
        self
    }

    /// Render the test case in the file format
    ///
    /// Always uses three-character fences, regardless of the fences the test
    /// case was originally written with.
    pub fn pretty(&self) -> String {
        format!(
            "$ {}\n<<<\n{}<<<\n>>>\n{}>>>\n",
            self.command, self.input, self.output
        )
    }
}

impl Display for TestCase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty())
    }
}
