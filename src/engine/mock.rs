//! Scripted in-process engine for tests.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{EngineError, EngineResult};
use super::types::{EngineSpec, SamplingConfig};
use super::GenerationEngine;

type Responder = Arc<dyn Fn(&str) -> String + Send + Sync>;

const DEFAULT_COMPLETION: &str =
    r#"{"score": 0.5, "reasoning": "mock evaluation", "research_summary": "mock summary"}"#;

#[derive(Default)]
struct MockState {
    loaded: Option<String>,
    failing_models: HashSet<String>,
    fail_next_generate: Option<String>,
    drop_last_output: bool,
    initialized: Vec<EngineSpec>,
    releases: usize,
    generate_calls: usize,
    last_prompts: Vec<String>,
    last_sampling: Option<SamplingConfig>,
}

/// Engine whose completions come from a closure over each prompt.
pub struct MockEngine {
    state: Mutex<MockState>,
    responder: Mutex<Responder>,
    generate_delay: Mutex<Duration>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    /// Every prompt gets the same mid-range JSON completion.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            responder: Mutex::new(Arc::new(|_| DEFAULT_COMPLETION.to_string())),
            generate_delay: Mutex::new(Duration::ZERO),
        }
    }

    /// Uses `f(prompt)` as the completion for each prompt.
    pub fn with_responder<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let engine = Self::new();
        *engine.responder.lock() = Arc::new(f);
        engine
    }

    /// Returns the given completions by position (missing positions get `""`).
    pub fn with_completions<I, S>(completions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let completions: Vec<String> = completions.into_iter().map(Into::into).collect();
        let engine = Self::new();
        let cursor = Arc::new(Mutex::new(0usize));
        *engine.responder.lock() = Arc::new(move |_| {
            let mut i = cursor.lock();
            let out = completions.get(*i).cloned().unwrap_or_default();
            *i += 1;
            out
        });
        engine
    }

    /// Makes `initialize` fail for this model path.
    pub fn fail_initialize_for(&self, model_path: &str) {
        self.state.lock().failing_models.insert(model_path.to_string());
    }

    /// Makes the next `generate` call fail with `reason`.
    pub fn fail_next_generate(&self, reason: &str) {
        self.state.lock().fail_next_generate = Some(reason.to_string());
    }

    /// Makes every `generate` call return one completion too few.
    pub fn drop_last_output(&self) {
        self.state.lock().drop_last_output = true;
    }

    /// Sleeps inside `generate` (for lock/cancellation tests).
    pub fn set_generate_delay(&self, delay: Duration) {
        *self.generate_delay.lock() = delay;
    }

    pub fn loaded_model(&self) -> Option<String> {
        self.state.lock().loaded.clone()
    }

    /// Every spec passed to `initialize`, successful or not.
    pub fn initialized_specs(&self) -> Vec<EngineSpec> {
        self.state.lock().initialized.clone()
    }

    pub fn release_count(&self) -> usize {
        self.state.lock().releases
    }

    pub fn generate_calls(&self) -> usize {
        self.state.lock().generate_calls
    }

    pub fn last_prompts(&self) -> Vec<String> {
        self.state.lock().last_prompts.clone()
    }

    pub fn last_sampling(&self) -> Option<SamplingConfig> {
        self.state.lock().last_sampling
    }
}

#[async_trait]
impl GenerationEngine for MockEngine {
    async fn initialize(&self, spec: &EngineSpec) -> EngineResult<()> {
        let mut state = self.state.lock();
        state.initialized.push(spec.clone());
        if state.failing_models.contains(&spec.model_path) {
            state.loaded = None;
            return Err(EngineError::Other(format!(
                "out of memory while loading {}",
                spec.model_path
            )));
        }
        state.loaded = Some(spec.model_path.clone());
        Ok(())
    }

    async fn release(&self) {
        let mut state = self.state.lock();
        state.loaded = None;
        state.releases += 1;
    }

    async fn generate(
        &self,
        prompts: &[String],
        sampling: &SamplingConfig,
    ) -> EngineResult<Vec<String>> {
        let delay = *self.generate_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let (failure, drop_last) = {
            let mut state = self.state.lock();
            state.generate_calls += 1;
            state.last_prompts = prompts.to_vec();
            state.last_sampling = Some(*sampling);
            if state.loaded.is_none() {
                return Err(EngineError::NotInitialized);
            }
            (state.fail_next_generate.take(), state.drop_last_output)
        };

        if let Some(reason) = failure {
            return Err(EngineError::Other(reason));
        }

        let responder = Arc::clone(&*self.responder.lock());
        let mut outputs: Vec<String> = prompts.iter().map(|p| responder(p)).collect();
        if drop_last {
            outputs.pop();
        }
        Ok(outputs)
    }
}
