use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{info, instrument};

use profalign::{BatchRequest, UnloadOutcome};

use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    EvaluateRequest, EvaluateResponse, LoadModelRequest, LoadModelResponse, UnloadModelResponse,
};
use crate::gateway::state::HandlerState;

#[instrument(skip(state, body), fields(model_id = tracing::field::Empty))]
pub async fn load_model_handler(
    State(state): State<HandlerState>,
    body: Result<Json<LoadModelRequest>, JsonRejection>,
) -> Result<Json<LoadModelResponse>, GatewayError> {
    let Json(request) = body?;
    tracing::Span::current().record("model_id", tracing::field::display(&request.model_id));

    let loaded = state.manager.load(&request.model_id).await?;
    let model_id = loaded.descriptor.id;
    info!(model_id, "Model ready");

    Ok(Json(LoadModelResponse {
        status: "loaded".to_string(),
        model: model_id.to_string(),
        message: format!("Model {model_id} loaded successfully"),
    }))
}

#[instrument(skip(state))]
pub async fn unload_model_handler(State(state): State<HandlerState>) -> Json<UnloadModelResponse> {
    let (status, message) = match state.manager.unload().await {
        UnloadOutcome::Unloaded { model_id } => {
            ("unloaded", format!("Model {model_id} unloaded successfully"))
        }
        UnloadOutcome::NothingLoaded => ("no_model_loaded", "No model to unload".to_string()),
    };

    Json(UnloadModelResponse {
        status: status.to_string(),
        message,
    })
}

#[instrument(skip(state, body), fields(professors = tracing::field::Empty))]
pub async fn evaluate_batch_handler(
    State(state): State<HandlerState>,
    body: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<EvaluateResponse>, GatewayError> {
    let Json(request) = body?;
    tracing::Span::current().record("professors", request.professors.len());

    let report = state
        .orchestrator
        .evaluate_batch(BatchRequest::from(request))
        .await?;

    Ok(Json(EvaluateResponse::from(report)))
}
