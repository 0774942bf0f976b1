//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The drawing surface rejected a primitive.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Chart data cannot be drawn.
    #[error("Invalid chart: {0}")]
    InvalidChart(String),

    /// Draw log serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
