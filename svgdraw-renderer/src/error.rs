//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while generating or rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The drawing document could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A render sink rejected a call.
    #[error("Render sink error: {0}")]
    Sink(String),
}
