use std::fmt::{self, Display};
use std::io;

use scheduler::SchedulerError;

/// Why an input file could not be turned into a workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input has no content at all.
    Empty,
    /// The first line is not a process count.
    BadCount { value: String },
    /// Fewer process lines than announced, or no quantum line after them.
    MissingLines { expected: usize, found: usize },
    /// A process line does not have exactly four fields.
    WrongFieldCount { line: usize, found: usize },
    /// A numeric field could not be read.
    NotANumber {
        line: usize,
        field: &'static str,
        value: String,
    },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "input is empty"),
            ParseError::BadCount { value } => {
                write!(f, "line 1: expected a process count, found {value:?}")
            }
            ParseError::MissingLines { expected, found } => {
                write!(f, "expected at least {expected} lines, found {found}")
            }
            ParseError::WrongFieldCount { line, found } => write!(
                f,
                "line {line}: expected `name arrival duration priority`, found {found} fields"
            ),
            ParseError::NotANumber { line, field, value } => {
                write!(f, "line {line}: {field} {value:?} is not an integer")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Everything that can go wrong between an input file and a report.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Parse(ParseError),
    Schedule(SchedulerError),
    Config(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Parse(err) => write!(f, "malformed input: {err}"),
            Error::Schedule(err) => write!(f, "{err}"),
            Error::Config(message) => write!(f, "configuration error: {message}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Parse(err) => Some(err),
            Error::Schedule(err) => Some(err),
            Error::Config(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

impl From<SchedulerError> for Error {
    fn from(err: SchedulerError) -> Self {
        Error::Schedule(err)
    }
}
