//! Error taxonomy shared by every analysis component.
//!
//! Library functions return [`AnalysisError`]; the command layer wraps them in
//! `anyhow` with file-path context before they reach the user.

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Malformed input while loading. `line` is 1-based and counts the header.
    #[error("parse error at line {line}: {message}")]
    Parse { line: u64, message: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("division by zero computing ratio of {numerator}")]
    DivisionByZero { numerator: f64 },
    /// Internal invariant violated; indicates a bug rather than bad input.
    #[error("consistency error: {0}")]
    Consistency(String),
    #[error("opening {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AnalysisError {
    pub fn parse(line: u64, message: impl Into<String>) -> Self {
        AnalysisError::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        AnalysisError::InvalidArgument(message.into())
    }

    pub fn consistency(message: impl Into<String>) -> Self {
        AnalysisError::Consistency(message.into())
    }
}
