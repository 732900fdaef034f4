//! Error types for builder state operations.

use thiserror::Error;

/// Result type for builder state operations.
pub type BuilderResult<T> = Result<T, BuilderError>;

/// Errors that can occur in builder state operations.
///
/// Mutating store operations never fail - a missing target id leaves state
/// unchanged - so this covers only the snapshot serialization boundary.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// State snapshot serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
