use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::ModelDescriptor;
use crate::engine::{EngineSpec, SamplingConfig};

#[derive(Debug, Clone, PartialEq)]
/// A model that finished loading.
pub struct LoadedModel {
    pub descriptor: &'static ModelDescriptor,
    pub sampling: SamplingConfig,
    pub spec: EngineSpec,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default)]
/// The single process-wide model slot.
pub enum EngineState {
    #[default]
    Unloaded,
    Loaded(LoadedModel),
}

impl EngineState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, EngineState::Loaded(_))
    }

    pub fn loaded(&self) -> Option<&LoadedModel> {
        match self {
            EngineState::Loaded(model) => Some(model),
            EngineState::Unloaded => None,
        }
    }

    /// Catalog id of the loaded model.
    pub fn current_model_id(&self) -> Option<&'static str> {
        self.loaded().map(|m| m.descriptor.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnloadOutcome {
    Unloaded { model_id: &'static str },
    NothingLoaded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Health view of the model slot.
pub struct EngineStatus {
    pub model_loaded: bool,
    pub current_model: Option<&'static str>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl From<&EngineState> for EngineStatus {
    fn from(state: &EngineState) -> Self {
        Self {
            model_loaded: state.is_loaded(),
            current_model: state.current_model_id(),
            loaded_at: state.loaded().map(|m| m.loaded_at),
        }
    }
}
