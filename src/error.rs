// third-party imports
use thiserror::Error as ThisError;

// ---

/// Error is a parse failure with the codepoint index where it was detected.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at {position}")]
pub struct Error {
    pub kind: ErrorKind,
    pub position: usize,
}

impl Error {
    pub fn new(kind: ErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

// ---

/// ErrorKind is the closed set of faults the parser can report.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("pre-3.0 log format is not supported")]
    UnsupportedVersion,
    #[error("unknown severity {0:?}")]
    UnknownSeverity(char),
    #[error("expected {expected:?}, but got {found:?}")]
    ExpectedLiteral { expected: char, found: char },
    #[error("found end of line before expected rune")]
    UnexpectedEnd,
    #[error("unexpected constructor {0:?}")]
    UnknownConstructor(String),
    #[error("malformed number {0:?}")]
    MalformedNumber(String),
    #[error("expected '}}' or ',' in document")]
    MalformedMap,
    #[error("expected ']' or ',' in list")]
    MalformedList,
    #[error("invalid duration specifier")]
    InvalidDuration,
    #[error("invalid {0} in timestamp")]
    MalformedTimestamp(&'static str),
    #[error("unexpected start character {found:?} for value of field {field:?}")]
    UnexpectedValueStart { field: String, found: char },
    #[error("unexpected start of document value {0:?}")]
    UnexpectedDocValue(String),
    #[error("unexpected end of line reading embedded payload")]
    TruncatedPayload,
    #[error("rune {0:?} is illegal in this context")]
    IllegalIdentifierRune(char),
    #[error("document grammar rejected input: {0}")]
    Grammar(String),
}

// ---

/// MakeError stamps an error kind with the position of its source.
pub trait MakeError {
    fn make_error(&self, kind: ErrorKind) -> Error;
}

/// Result is an alias for a standard result with the bound Error type.
pub type Result<T> = std::result::Result<T, Error>;
