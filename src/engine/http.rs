//! OpenAI-compatible completion client.
//!
//! The engine process is started out of band (e.g. `vllm serve Qwen/Qwen2.5-7B-Instruct`);
//! `initialize` only confirms the requested model is the one being served. Sizing
//! fields of [`EngineSpec`] are recorded in the logs for the operator.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::{EngineError, EngineResult};
use super::types::{EngineSpec, SamplingConfig};
use super::GenerationEngine;

const MODELS_PATH: &str = "v1/models";
const COMPLETIONS_PATH: &str = "v1/completions";

pub struct HttpEngine {
    base_url: String,
    http: HttpClient,
    served_model: RwLock<Option<String>>,
}

impl std::fmt::Debug for HttpEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEngine")
            .field("base_url", &self.base_url)
            .field("served_model", &*self.served_model.read())
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelCard>,
}

#[derive(Debug, Deserialize)]
struct ModelCard {
    id: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a [String],
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    repetition_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChoice {
    pub(crate) index: usize,
    #[serde(default)]
    pub(crate) text: String,
}

impl HttpEngine {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> EngineResult<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            served_model: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn served_models(&self) -> EngineResult<Vec<String>> {
        let url = self.url(MODELS_PATH);
        let res = self.http.get(&url).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(EngineError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        let list: ModelList = res.json().await?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }
}

#[async_trait]
impl GenerationEngine for HttpEngine {
    async fn initialize(&self, spec: &EngineSpec) -> EngineResult<()> {
        *self.served_model.write() = None;

        info!(
            engine = %self.base_url,
            model_path = %spec.model_path,
            gpu_memory_utilization = spec.gpu_memory_utilization,
            max_model_len = spec.max_model_len,
            quantization = ?spec.quantization,
            "Attaching to generation engine"
        );

        let served = self.served_models().await?;
        if !served.iter().any(|id| id == &spec.model_path) {
            return Err(EngineError::ModelNotServed {
                model: spec.model_path.clone(),
                served: served.join(", "),
            });
        }

        *self.served_model.write() = Some(spec.model_path.clone());
        Ok(())
    }

    async fn release(&self) {
        if let Some(model) = self.served_model.write().take() {
            debug!(model = %model, "Detached from generation engine");
        }
    }

    async fn generate(
        &self,
        prompts: &[String],
        sampling: &SamplingConfig,
    ) -> EngineResult<Vec<String>> {
        let model = self
            .served_model
            .read()
            .clone()
            .ok_or(EngineError::NotInitialized)?;

        let body = CompletionRequest {
            model: &model,
            prompt: prompts,
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            max_tokens: sampling.max_tokens,
            repetition_penalty: sampling.repetition_penalty,
        };

        let res = self
            .http
            .post(self.url(COMPLETIONS_PATH))
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Completion request rejected");
            return Err(EngineError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = res.json().await?;
        order_choices(parsed.choices, prompts.len())
    }
}

/// Reorders choices by `index` and checks there is exactly one per prompt.
pub(crate) fn order_choices(
    mut choices: Vec<CompletionChoice>,
    expected: usize,
) -> EngineResult<Vec<String>> {
    if choices.len() != expected {
        return Err(EngineError::OutputMismatch {
            expected,
            actual: choices.len(),
        });
    }

    choices.sort_by_key(|c| c.index);
    for (position, choice) in choices.iter().enumerate() {
        if choice.index != position {
            return Err(EngineError::MalformedResponse {
                reason: format!(
                    "choice indices are not 0..{expected} (found {} at position {position})",
                    choice.index
                ),
            });
        }
    }

    Ok(choices.into_iter().map(|c| c.text).collect())
}
