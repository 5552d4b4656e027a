//! Error types for the B-tree engine.

use thiserror::Error;

/// Result type alias for tree operations
pub type Result<T> = std::result::Result<T, BTreeError>;

/// Errors that can occur in the B-tree engine
#[derive(Error, Debug)]
pub enum BTreeError {
    /// Minimum degree outside the usable range
    #[error("Invalid degree {degree}: minimum degree must be between {min} and {max}")]
    InvalidDegree { degree: usize, min: usize, max: usize },

    /// A structural invariant does not hold (implementation fault)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Snapshot could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BTreeError {
    /// Create an invariant violation error with a message
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}
