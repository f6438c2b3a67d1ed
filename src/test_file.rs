//! Parser for test files
//!
//! A test file is a sequence of blocks like the following:
//!
//! ```text
//! $ cat
//! <<<
//! hello
//! <<<
//! >>>
//! hello
//! >>>
//! ```
//!
//! Fences are at least three characters wide, and a body is only closed by a
//! fence of exactly the same width as the one that opened it. Blank lines and
//! lines starting with `NB.` are comments between blocks, but literal content
//! inside bodies.

use crate::test_case::TestCase;
use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

const MIN_FENCE_LENGTH: usize = 3;
const INPUT_FENCE: char = '<';
const OUTPUT_FENCE: char = '>';
const COMMAND_PREFIX: &str = "$ ";
const COMMENT_PREFIX: &str = "NB.";

// ERRORS

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line_number}: expected a line starting with $, or a comment. got {line}")]
    ExpectedCommand { line_number: usize, line: String },

    #[error("line {line_number}: expected a line starting with at least <<<. got {line}")]
    ExpectedInputFence { line_number: usize, line: String },

    #[error("line {line_number}: expected a line starting with at least >>>. got {line}")]
    ExpectedOutputFence { line_number: usize, line: String },

    #[error("unexpected end of file while expecting {expecting} for test `{command}`")]
    UnexpectedEof { expecting: Expecting, command: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("failed to read test file: {0}")]
    FailedToReadFile(#[from] io::Error),

    #[error(transparent)]
    FailedToParse(#[from] ParseError),
}

// READ TEST FILE

/// Read and parse a test file, or standard input if `path` is `-`
pub fn read_file(path: &Path) -> Result<Vec<TestCase>, ReadError> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };

    let test_cases = parse_str(&content)?;

    debug!(
        path = %path.display(),
        count = test_cases.len(),
        "parsed test file"
    );

    Ok(test_cases)
}

/// Parse the content of a test file
///
/// `\r\n` and lone `\r` terminators are read as `\n`. Line terminators are
/// kept, so bodies receive their lines verbatim.
pub fn parse_str(content: &str) -> Result<Vec<TestCase>, ParseError> {
    let content = normalize_newlines(content);
    parse_lines(content.split_inclusive('\n'))
}

fn normalize_newlines(content: &str) -> Cow<'_, str> {
    if content.contains('\r') {
        Cow::Owned(content.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(content)
    }
}

/// Parse a sequence of lines
///
/// The first malformed line aborts the whole parse. No test cases are
/// returned in that case, not even those that preceded the error.
pub fn parse_lines<'a, I>(lines: I) -> Result<Vec<TestCase>, ParseError>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .try_fold(ParserState::new(), |state, line| state.next(line))?
        .finish()
}

// STATE MACHINE

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expecting {
    Command,
    StartInput,
    EndInput,
    StartOutput,
    EndOutput,
}

impl Display for Expecting {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Command => "command",
            Self::StartInput => "start-input",
            Self::EndInput => "end-input",
            Self::StartOutput => "start-output",
            Self::EndOutput => "end-output",
        };
        write!(f, "{}", name)
    }
}

struct ParserState {
    expecting: Expecting,
    tests: Vec<TestCase>,
    // Only set while a test block is open
    current: Option<TestCase>,
    // Width of the fence that opened the current body
    length: usize,
    line_number: usize,
}

impl ParserState {
    fn new() -> ParserState {
        ParserState {
            expecting: Expecting::Command,
            tests: vec![],
            current: None,
            length: MIN_FENCE_LENGTH,
            line_number: 0,
        }
    }

    fn next(mut self, line: &str) -> Result<ParserState, ParseError> {
        self.line_number += 1;

        let trimmed = line.trim();
        let skip = trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX);

        match self.expecting {
            Expecting::Command => {
                if skip {
                    return Ok(self);
                }

                if let Some(command) = trimmed.strip_prefix(COMMAND_PREFIX) {
                    self.current = Some(TestCase::new(command));
                    self.expecting = Expecting::StartInput;
                    return Ok(self);
                }

                Err(ParseError::ExpectedCommand {
                    line_number: self.line_number,
                    line: trimmed.to_owned(),
                })
            }
            Expecting::StartInput => {
                if skip {
                    return Ok(self);
                }

                if let Some(length) = opening_fence_length(trimmed, INPUT_FENCE) {
                    self.expecting = Expecting::EndInput;
                    self.length = length;
                    return Ok(self);
                }

                Err(ParseError::ExpectedInputFence {
                    line_number: self.line_number,
                    line: trimmed.to_owned(),
                })
            }
            Expecting::EndInput => {
                if is_closing_fence(trimmed, INPUT_FENCE, self.length) {
                    self.expecting = Expecting::StartOutput;
                } else {
                    self.current = self.current.map(|test| test.append_input(line));
                }

                Ok(self)
            }
            Expecting::StartOutput => {
                if skip {
                    return Ok(self);
                }

                if let Some(length) = opening_fence_length(trimmed, OUTPUT_FENCE) {
                    self.expecting = Expecting::EndOutput;
                    self.length = length;
                    return Ok(self);
                }

                Err(ParseError::ExpectedOutputFence {
                    line_number: self.line_number,
                    line: trimmed.to_owned(),
                })
            }
            Expecting::EndOutput => {
                if is_closing_fence(trimmed, OUTPUT_FENCE, self.length) {
                    self.tests.extend(self.current.take());
                    self.expecting = Expecting::Command;
                } else {
                    self.current = self.current.map(|test| test.append_output(line));
                }

                Ok(self)
            }
        }
    }

    fn finish(self) -> Result<Vec<TestCase>, ParseError> {
        match self.expecting {
            Expecting::Command => Ok(self.tests),
            expecting => Err(ParseError::UnexpectedEof {
                expecting,
                command: self.current.map(|test| test.command).unwrap_or_default(),
            }),
        }
    }
}

fn opening_fence_length(trimmed: &str, fence: char) -> Option<usize> {
    let length = trimmed.chars().count();
    if length >= MIN_FENCE_LENGTH && trimmed.chars().all(|c| c == fence) {
        Some(length)
    } else {
        None
    }
}

fn is_closing_fence(trimmed: &str, fence: char, length: usize) -> bool {
    opening_fence_length(trimmed, fence) == Some(length)
}

// TESTS
