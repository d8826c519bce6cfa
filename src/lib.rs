//! ProfAlign library crate (used by the server and integration tests).
//!
//! Scores how well professors' research profiles align with a research direction by
//! running one batch of prompts through a locally hosted LLM.
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`ModelManager`] - the single model slot: load, unload, exclusive sessions
//! - [`PromptBuilder`] - template selection and placeholder rendering
//! - [`parse`], [`parse_with_scheme`], [`validate`] - completion extraction and gating
//! - [`BatchOrchestrator`] - one generation call per batch, aggregated report
//!
//! ## Seams
//! - [`GenerationEngine`] with [`HttpEngine`] (OpenAI-compatible server)
//! - [`AcceleratorInfo`] with [`NvidiaSmiProbe`], [`FixedAccelerator`], [`NoAccelerator`]
//! - [`TemplateSource`] with [`DirTemplateSource`], [`StaticTemplateSource`]
//!
//! ## Configuration
//! - [`Config`], [`ConfigError`] - `PROFALIGN_*` environment variables
//!
//! ## Test/Mock Support
//! [`MockEngine`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod batch;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod engine;
pub mod lifecycle;
pub mod profile;
pub mod prompt;
pub mod scoring;

pub use batch::{BatchError, BatchOrchestrator, BatchReport, BatchRequest, BatchResult};
pub use catalog::{
    CatalogEntry, MODEL_CATALOG, ModelDescriptor, ParameterClass, available_ids,
    catalog_entries, find_model,
};
pub use config::{Config, ConfigError};
#[cfg(any(test, feature = "mock"))]
pub use engine::MockEngine;
pub use engine::{
    EngineError, EngineResult, EngineSpec, GenerationEngine, HttpEngine, Quantization,
    SamplingConfig,
};
pub use lifecycle::{
    AcceleratorInfo, AcceleratorMemory, EngineState, EngineStatus, FixedAccelerator,
    InferenceSession, LifecycleConfig, LifecycleError, LifecycleResult, LoadedModel,
    ModelManager, NoAccelerator, NvidiaSmiProbe, UnloadOutcome,
};
pub use profile::{Publication, ResearcherProfile};
pub use prompt::{
    DirTemplateSource, PromptBuilder, PromptPolicy, ScoringScheme, StaticTemplateSource,
    StrictnessTier, TemplateError, TemplateSource,
};
pub use scoring::{
    DecisionPath, EvaluationResult, Extraction, ExtractionMethod, RejectReason, parse,
    parse_with_scheme, validate,
};
