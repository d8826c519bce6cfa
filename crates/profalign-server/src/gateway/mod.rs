//! HTTP gateway (Axum) for model lifecycle and batch evaluation.
//!
//! This module is primarily used by the `profalign` server binary.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{GatewayError, PROFALIGN_STATUS_HEADER};
pub use handler::{evaluate_batch_handler, load_model_handler, unload_model_handler};
pub use state::HandlerState;

use payload::{EndpointIndex, HealthResponse, ModelsResponse, RootResponse};
use profalign::catalog_entries;

pub const PROFALIGN_STATUS_HEALTHY: &str = "healthy";

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/models", get(models_handler))
        .route("/load_model", post(load_model_handler))
        .route("/unload_model", post(unload_model_handler))
        .route("/evaluate_batch", post(evaluate_batch_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentialed CORS for the listed browser origins. Unparseable origins are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[tracing::instrument(skip(state))]
pub async fn root_handler(State(state): State<HandlerState>) -> Json<RootResponse> {
    let status = state.manager.engine_status();
    Json(RootResponse {
        message: "CSProfAlign vLLM Backend",
        status: "running",
        model_loaded: status.model_loaded,
        current_model: status.current_model,
        endpoints: EndpointIndex::default(),
    })
}

#[tracing::instrument(skip(state))]
pub async fn health_handler(State(state): State<HandlerState>) -> Response {
    let status = state.manager.engine_status();

    let mut headers = HeaderMap::new();
    headers.insert(
        PROFALIGN_STATUS_HEADER,
        HeaderValue::from_static(PROFALIGN_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse {
            status: PROFALIGN_STATUS_HEALTHY.to_string(),
            model_loaded: status.model_loaded,
            current_model: status.current_model.map(str::to_string),
        }),
    )
        .into_response()
}

#[tracing::instrument]
pub async fn models_handler() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: catalog_entries(),
    })
}
