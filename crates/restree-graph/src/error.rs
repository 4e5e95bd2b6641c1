//! Failures raised by the graph model.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("no such member: {0}")]
    NoSuchMember(String),
    #[error("no such key: {0}")]
    NoSuchKey(String),
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("not a valid index: {0:?}")]
    InvalidIndex(String),
    #[error("value type mismatch: {text:?} is not {ty}")]
    Format { text: String, ty: &'static str },
    #[error("{text} out of range for {ty} ({min}..={max})")]
    Overflow {
        text: String,
        ty: &'static str,
        min: i128,
        max: i128,
    },
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl GraphError {
    /// True for failures meaning "the addressed member or key does not
    /// exist", as distinct from coercion and type failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GraphError::NoSuchMember(_) | GraphError::NoSuchKey(_))
    }
}
