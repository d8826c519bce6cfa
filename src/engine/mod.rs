//! Seam to the text-generation engine.
//!
//! The engine is an opaque batch function: prompts in, one completion per prompt out.
//! [`HttpEngine`] talks to an OpenAI-compatible completion server (vLLM's
//! `--api-server`); [`MockEngine`] scripts completions for tests.

pub mod error;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod types;


pub use error::{EngineError, EngineResult};
pub use http::HttpEngine;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEngine;
pub use types::{DEFAULT_MAX_MODEL_LEN, EngineSpec, Quantization, SamplingConfig};

use async_trait::async_trait;

#[async_trait]
/// Text-generation capability consumed by the lifecycle manager.
///
/// Callers serialize access; implementations need not guard against interleaved
/// `initialize`/`release`/`generate` calls.
pub trait GenerationEngine: Send + Sync {
    /// Brings the model described by `spec` up. On error nothing stays loaded.
    async fn initialize(&self, spec: &EngineSpec) -> EngineResult<()>;

    /// Releases whatever `initialize` brought up. Never fails.
    async fn release(&self);

    /// Produces exactly one completion per prompt, in prompt order.
    async fn generate(
        &self,
        prompts: &[String],
        sampling: &SamplingConfig,
    ) -> EngineResult<Vec<String>>;
}
