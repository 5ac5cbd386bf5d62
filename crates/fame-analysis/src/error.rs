//! Error types for audio analysis.

use thiserror::Error;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur inside the analysis stages.
///
/// Stage errors never escape the pipeline: the orchestrator catches them
/// at each stage boundary, logs them, and falls through to the next
/// compensation step (ultimately the fallback segmenter).
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Track has no samples")]
    EmptyTrack,

    #[error("Track duration must be positive, got {0}")]
    NonPositiveDuration(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnalysisError {
    /// Create an invalid-configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
