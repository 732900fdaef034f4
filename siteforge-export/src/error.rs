//! Export error types.

use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur during export.
///
/// The image pipeline is the only part of the engine that surfaces failures
/// to its caller; everything upstream degrades silently.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Off-screen measurement failed.
    #[error("Measurement failed: {0}")]
    Measure(String),

    /// The vector container could not be parsed or drawn.
    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    /// Bitmap encoding failed.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// The archive packaging collaborator reported a failure.
    #[error("Archive packaging failed: {0}")]
    Archive(String),

    /// The download collaborator could not deliver the blob.
    #[error("Download failed: {0}")]
    Download(String),
}
