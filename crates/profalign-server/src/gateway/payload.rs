//! Wire types for the HTTP API.

use serde::{Deserialize, Serialize};

use profalign::constants::{DEFAULT_BATCH_SIZE, DEFAULT_MATCH_THRESHOLD};
use profalign::{
    BatchReport, BatchRequest, CatalogEntry, EvaluationResult, ResearcherProfile, ScoringScheme,
    StrictnessTier,
};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoadModelRequest {
    pub model_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoadModelResponse {
    pub status: String,
    pub model: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnloadModelResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EvaluateRequest {
    pub professors: Vec<ResearcherProfile>,
    pub research_direction: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub scoring_scheme: ScoringScheme,
    #[serde(default = "default_strict_prompts")]
    pub strict_prompts: bool,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_threshold() -> f64 {
    DEFAULT_MATCH_THRESHOLD
}

fn default_strict_prompts() -> bool {
    true
}

impl From<EvaluateRequest> for BatchRequest {
    fn from(req: EvaluateRequest) -> Self {
        BatchRequest::new(req.professors, req.research_direction)
            .with_threshold(req.threshold)
            .with_scheme(req.scoring_scheme)
            .with_strictness(StrictnessTier::from_strict_flag(req.strict_prompts))
            .with_batch_size(req.batch_size)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EvaluateResponse {
    pub results: Vec<EvaluationResult>,
    pub processing_time: f64,
    pub model_name: String,
    pub matched_count: usize,
    pub average_score: f64,
}

impl From<BatchReport> for EvaluateResponse {
    fn from(report: BatchReport) -> Self {
        Self {
            results: report.results,
            processing_time: report.processing_time,
            model_name: report.model_name,
            matched_count: report.matched_count,
            average_score: report.average_score,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub current_model: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub model_loaded: bool,
    pub current_model: Option<&'static str>,
    pub endpoints: EndpointIndex,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointIndex {
    pub health: &'static str,
    pub models: &'static str,
    pub load_model: &'static str,
    pub unload_model: &'static str,
    pub evaluate_batch: &'static str,
}

impl Default for EndpointIndex {
    fn default() -> Self {
        Self {
            health: "/health",
            models: "/models",
            load_model: "/load_model (POST)",
            unload_model: "/unload_model (POST)",
            evaluate_batch: "/evaluate_batch (POST)",
        }
    }
}
