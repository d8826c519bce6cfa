use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{error, info, instrument};

use crate::catalog::{ModelDescriptor, available_ids, find_model};
use crate::engine::{EngineError, EngineResult, GenerationEngine};

use super::accelerator::{AcceleratorInfo, build_accelerator};
use super::config::LifecycleConfig;
use super::error::{LifecycleError, LifecycleResult};
use super::sizing;
use super::types::{EngineState, EngineStatus, LoadedModel, UnloadOutcome};

/// Owns the single model slot and serializes load, unload and generation.
///
/// Every operation that touches the engine runs under one session lock, so concurrent
/// callers queue. Load and unload run in their own task: once issued they finish even
/// if the caller goes away, so the state is never left half-transitioned.
#[derive(Clone)]
pub struct ModelManager {
    inner: Arc<Inner>,
}

struct Inner {
    config: LifecycleConfig,
    engine: Arc<dyn GenerationEngine>,
    accelerator: Arc<dyn AcceleratorInfo>,
    session: Arc<Mutex<EngineState>>,
    snapshot: RwLock<EngineState>,
}

impl std::fmt::Debug for ModelManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelManager")
            .field("config", &self.inner.config)
            .field("state", &*self.inner.snapshot.read())
            .finish()
    }
}

impl ModelManager {
    /// Creates a manager in `Unloaded` with explicit engine and accelerator.
    pub fn new(
        config: LifecycleConfig,
        engine: Arc<dyn GenerationEngine>,
        accelerator: Arc<dyn AcceleratorInfo>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                engine,
                accelerator,
                session: Arc::new(Mutex::new(EngineState::Unloaded)),
                snapshot: RwLock::new(EngineState::Unloaded),
            }),
        }
    }

    /// Creates a manager whose accelerator source follows the config.
    pub fn with_engine(config: LifecycleConfig, engine: Arc<dyn GenerationEngine>) -> Self {
        let accelerator = build_accelerator(&config);
        Self::new(config, engine, accelerator)
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.inner.config
    }

    /// Last published state. Does not wait for the session lock.
    pub fn status(&self) -> EngineState {
        self.inner.snapshot.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.snapshot.read().is_loaded()
    }

    /// Health view of [`Self::status`].
    pub fn engine_status(&self) -> EngineStatus {
        EngineStatus::from(&*self.inner.snapshot.read())
    }

    /// Loads `model_id`, unloading whatever is loaded first.
    #[instrument(skip(self))]
    pub async fn load(&self, model_id: &str) -> LifecycleResult<LoadedModel> {
        let descriptor = find_model(model_id).ok_or_else(|| LifecycleError::UnknownModel {
            model_id: model_id.to_string(),
            available: available_ids(),
        })?;

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let mut state = Arc::clone(&inner.session).lock_owned().await;
            inner.load_locked(&mut state, descriptor).await
        });

        match task.await {
            Ok(result) => result,
            Err(e) => Err(LifecycleError::LoadFailure {
                model_id: descriptor.id.to_string(),
                source: EngineError::Other(format!("load task did not complete: {e}")),
            }),
        }
    }

    /// Releases the loaded model (if any) and waits out the settle delay.
    #[instrument(skip(self))]
    pub async fn unload(&self) -> UnloadOutcome {
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let mut state = Arc::clone(&inner.session).lock_owned().await;
            inner.unload_locked(&mut state).await
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                error!(error = %e, "Unload task did not complete");
                UnloadOutcome::NothingLoaded
            }
        }
    }

    /// Waits for exclusive use of the engine.
    pub async fn session(&self) -> InferenceSession {
        let state = Arc::clone(&self.inner.session).lock_owned().await;
        InferenceSession {
            state,
            engine: Arc::clone(&self.inner.engine),
        }
    }

    /// Unloads on process exit.
    pub async fn shutdown(&self) {
        if let UnloadOutcome::Unloaded { model_id } = self.unload().await {
            info!(model_id = model_id, "Model released during shutdown");
        }
    }
}

impl Inner {
    async fn load_locked(
        &self,
        state: &mut EngineState,
        descriptor: &'static ModelDescriptor,
    ) -> LifecycleResult<LoadedModel> {
        if let Some(current) = state.current_model_id() {
            info!(
                current = current,
                target = descriptor.id,
                "Unloading current model before load"
            );
            self.unload_locked(state).await;
        }

        let memory = self.accelerator.memory().await;
        match memory {
            Some(m) => info!(
                total_gib = format_args!("{:.1}", m.total_gib()),
                free_gib = format_args!("{:.1}", m.free_gib()),
                "Accelerator detected"
            ),
            None => info!("No accelerator detected, using CPU fallback sizing"),
        }

        let spec = sizing::engine_spec(descriptor, memory);
        let sampling = sizing::sampling_config(descriptor.size);

        info!(
            model_id = descriptor.id,
            model_path = descriptor.model_path,
            gpu_memory_utilization = spec.gpu_memory_utilization,
            temperature = sampling.temperature,
            quantization = ?spec.quantization,
            "Loading model"
        );

        let started = Instant::now();
        match self.engine.initialize(&spec).await {
            Ok(()) => {
                let loaded = LoadedModel {
                    descriptor,
                    sampling,
                    spec,
                    loaded_at: chrono::Utc::now(),
                };
                *state = EngineState::Loaded(loaded.clone());
                self.publish(state);
                info!(
                    model_id = descriptor.id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Model loaded"
                );
                Ok(loaded)
            }
            Err(source) => {
                self.engine.release().await;
                *state = EngineState::Unloaded;
                self.publish(state);
                error!(model_id = descriptor.id, error = %source, "Model load failed");
                Err(LifecycleError::LoadFailure {
                    model_id: descriptor.id.to_string(),
                    source,
                })
            }
        }
    }

    async fn unload_locked(&self, state: &mut EngineState) -> UnloadOutcome {
        let EngineState::Loaded(model) = std::mem::take(state) else {
            return UnloadOutcome::NothingLoaded;
        };

        let model_id = model.descriptor.id;
        info!(model_id = model_id, "Unloading model");
        self.engine.release().await;
        self.publish(state);

        if !self.config.unload_settle.is_zero() {
            tokio::time::sleep(self.config.unload_settle).await;
        }

        info!(model_id = model_id, "Model unloaded");
        UnloadOutcome::Unloaded { model_id }
    }

    fn publish(&self, state: &EngineState) {
        *self.snapshot.write() = state.clone();
    }
}

/// Exclusive hold on the engine. Other load/unload/generate calls wait until dropped.
pub struct InferenceSession {
    state: OwnedMutexGuard<EngineState>,
    engine: Arc<dyn GenerationEngine>,
}

impl InferenceSession {
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn loaded(&self) -> Option<&LoadedModel> {
        self.state.loaded()
    }

    /// Runs one batch through the engine with the loaded model's sampling config.
    pub async fn generate(&self, prompts: &[String]) -> EngineResult<Vec<String>> {
        let model = self.loaded().ok_or(EngineError::NotInitialized)?;
        let outputs = self.engine.generate(prompts, &model.sampling).await?;
        if outputs.len() != prompts.len() {
            return Err(EngineError::OutputMismatch {
                expected: prompts.len(),
                actual: outputs.len(),
            });
        }
        Ok(outputs)
    }
}
