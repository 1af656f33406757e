use thiserror::Error;

use crate::jsonpath::JsonPathError;

/// Reasons a tree operation can be rejected.
///
/// Every variant describes an expected, recoverable condition. Rejected
/// operations leave the tree exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Path not found: '{0}'")]
    PathNotFound(String),

    #[error("Cannot remove root-level branch: '{0}'")]
    RootProtected(String),

    #[error("Invalid data object: {0}")]
    InvalidData(String),

    #[error("Cannot move '{from}' into itself or its descendant '{to}'")]
    CyclicMove { from: String, to: String },

    #[error("Query failed: {0}")]
    Query(#[from] JsonPathError),
}

pub type TreeResult<T> = Result<T, TreeError>;
