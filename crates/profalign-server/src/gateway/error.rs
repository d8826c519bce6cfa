use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use profalign::{BatchError, LifecycleError};

/// Response header carrying a machine-readable error kind.
pub const PROFALIGN_STATUS_HEADER: &str = "x-profalign-status";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    MalformedBody(#[from] JsonRejection),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Batch(#[from] BatchError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: u16,
}

impl GatewayError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            GatewayError::MalformedBody(rejection) => (rejection.status(), "invalid_request"),
            GatewayError::Lifecycle(LifecycleError::UnknownModel { .. }) => {
                (StatusCode::BAD_REQUEST, "unknown_model")
            }
            GatewayError::Lifecycle(LifecycleError::LoadFailure { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "load_failed")
            }
            GatewayError::Batch(BatchError::NoModelLoaded) => {
                (StatusCode::BAD_REQUEST, "no_model_loaded")
            }
            GatewayError::Batch(BatchError::InvalidRequest { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_request")
            }
            GatewayError::Batch(BatchError::GenerationFailure { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "generation_failed")
            }
        }
    }

    fn detail(&self) -> String {
        match self {
            GatewayError::MalformedBody(rejection) => rejection.body_text(),
            GatewayError::Lifecycle(e @ LifecycleError::LoadFailure { .. }) => {
                format!("Failed to load model: {e}")
            }
            GatewayError::Batch(BatchError::NoModelLoaded) => {
                "No model loaded. Call /load_model first.".to_string()
            }
            GatewayError::Batch(e @ BatchError::GenerationFailure { .. }) => {
                format!("Evaluation failed: {e}")
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();

        if status.is_server_error() {
            tracing::error!(error = %self, kind, "Request failed");
        } else {
            tracing::debug!(error = %self, kind, "Request rejected");
        }

        let mut headers = HeaderMap::new();
        headers.insert(PROFALIGN_STATUS_HEADER, HeaderValue::from_static(kind));

        let body = Json(ErrorResponse {
            detail: self.detail(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
