use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine unreachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("engine does not serve model '{model}' (served: {served})")]
    ModelNotServed { model: String, served: String },

    #[error("engine returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("malformed engine response: {reason}")]
    MalformedResponse { reason: String },

    #[error("engine returned {actual} completions for {expected} prompts")]
    OutputMismatch { expected: usize, actual: usize },

    #[error("engine not initialized")]
    NotInitialized,

    #[error("engine failure: {0}")]
    Other(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        if err.is_connect() || err.is_timeout() {
            EngineError::Unreachable {
                url,
                reason: err.to_string(),
            }
        } else if err.is_decode() {
            EngineError::MalformedResponse {
                reason: err.to_string(),
            }
        } else {
            EngineError::Other(err.to_string())
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
