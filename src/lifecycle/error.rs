use thiserror::Error;

use crate::engine::EngineError;

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("Unknown model: {model_id}. Available: {available}")]
    UnknownModel { model_id: String, available: String },

    #[error("Model loading failed for {model_id}: {source}")]
    LoadFailure {
        model_id: String,
        #[source]
        source: EngineError,
    },
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
