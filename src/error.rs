use core::fmt;

/// Result alias for `spine`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by validation, extraction, and edge-list I/O.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input edge list was empty where a non-empty one was required.
    EmptyInput,

    /// A required column is missing from the input header.
    MissingColumn {
        /// Column name (`source`, `target`, or `weight`).
        name: &'static str,
    },

    /// A data record failed validation.
    MalformedRecord {
        /// 1-based record number (header excluded).
        record: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// A worker batch failed during backbone evaluation.
    BatchFailed {
        /// Zero-based batch index.
        batch: usize,
        /// Underlying cause.
        cause: String,
    },

    /// File read/write failure.
    Io {
        /// Path involved.
        path: String,
        /// Error message from the OS.
        message: String,
    },

    /// Generic error with message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::MissingColumn { name } => {
                write!(f, "input is missing required column '{name}'")
            }
            Error::MalformedRecord { record, reason } => {
                write!(f, "malformed record {record}: {reason}")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::BatchFailed { batch, cause } => {
                write!(f, "worker batch {batch} failed: {cause}")
            }
            Error::Io { path, message } => write!(f, "i/o error on '{path}': {message}"),
            Error::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}
