//! Error types for path parsing and evaluation.

use thiserror::Error;

use crate::record::{DataError, Kind};

/// Errors that can occur while parsing a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Unexpected token at a specific position.
    #[error("Unexpected token '{found}' at position {position}, expected {expected}")]
    UnexpectedToken {
        position: usize,
        found: String,
        expected: String,
    },
    /// Unexpected end of input.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: String },
    /// Invalid syntax with description.
    #[error("Invalid JsonPath syntax: {message}")]
    InvalidSyntax { message: String },
}

/// Errors raised by getters and updaters.
///
/// Every variant carries the resolved path at the point of failure.
#[derive(Debug, Error)]
pub enum PathError {
    /// The expression could not be parsed.
    #[error("invalid JsonPath '{expression}': {source}")]
    Parse {
        expression: String,
        source: ParseError,
    },

    /// A step found a value of the wrong container kind.
    #[error("field '{path}' is not {expected} but {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: Kind,
    },

    /// An array index step fell outside the array.
    #[error("index {index} is out of bounds for field '{path}' (len: {len})")]
    IndexOutOfBounds {
        path: String,
        index: isize,
        len: usize,
    },

    /// The record holds a kind its model cannot represent.
    #[error("{kind} is not supported for {location} '{path}'")]
    UnsupportedKind {
        path: String,
        kind: Kind,
        location: &'static str,
    },

    /// The record model rejected an access.
    #[error("An error occurred during processing of {model} value '{path}': {source}")]
    Access {
        path: String,
        model: &'static str,
        source: DataError,
    },
}

impl PathError {
    pub fn type_mismatch(path: impl Into<String>, expected: impl Into<String>, found: Kind) -> Self {
        PathError::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
            found,
        }
    }

    pub fn unsupported(path: impl Into<String>, kind: Kind, location: &'static str) -> Self {
        PathError::UnsupportedKind {
            path: path.into(),
            kind,
            location,
        }
    }

    pub fn access(path: impl Into<String>, model: &'static str, source: DataError) -> Self {
        PathError::Access {
            path: path.into(),
            model,
            source,
        }
    }

    /// Returns the path this error refers to. For parse failures this is
    /// the expression itself.
    pub fn path(&self) -> &str {
        match self {
            PathError::Parse { expression, .. } => expression,
            PathError::TypeMismatch { path, .. }
            | PathError::IndexOutOfBounds { path, .. }
            | PathError::UnsupportedKind { path, .. }
            | PathError::Access { path, .. } => path,
        }
    }
}
