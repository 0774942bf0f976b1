//! Error types for reveal configuration.
//!
//! Runtime reveal operations never fail: a missing surface is skipped.
//! These errors only surface while parsing or validating configuration.

use thiserror::Error;

/// Result type for reveal configuration operations.
pub type RevealResult<T> = Result<T, RevealError>;

/// Errors that can occur while building triggers from configuration.
#[derive(Debug, Error)]
pub enum RevealError {
    /// Visibility threshold outside `0.0..=1.0` (or not a number).
    #[error("Invalid threshold: {0} (expected 0.0..=1.0)")]
    InvalidThreshold(f64),

    /// Root margin string could not be parsed.
    #[error("Invalid root margin: {0}")]
    InvalidRootMargin(String),

    /// Counter target attribute was not a non-negative integer.
    #[error("Invalid counter value: {0}")]
    InvalidCount(String),

    /// Page configuration is inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
