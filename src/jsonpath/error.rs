//! Error types for JSONPath parsing.

use thiserror::Error;

/// Errors that can occur during JSONPath parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JsonPathError {
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
    #[error("Invalid JSONPath syntax: {message}")]
    InvalidSyntax { message: String },
}
