use thiserror::Error;

use crate::engine::EngineError;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("no model loaded; load a model first")]
    NoModelLoaded,

    #[error("batch generation failed: {source}")]
    GenerationFailure {
        #[source]
        source: EngineError,
    },

    #[error("invalid batch request: {reason}")]
    InvalidRequest { reason: String },
}

impl From<EngineError> for BatchError {
    fn from(source: EngineError) -> Self {
        match source {
            EngineError::NotInitialized => Self::NoModelLoaded,
            source => Self::GenerationFailure { source },
        }
    }
}

/// Convenience result type for batch evaluation.
pub type BatchResult<T> = Result<T, BatchError>;
