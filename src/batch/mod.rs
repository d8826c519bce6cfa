//! Batch evaluation: prompts per professor, one generation call, per-item parsing.

pub mod error;
pub mod orchestrator;
pub mod types;


pub use error::{BatchError, BatchResult};
pub use orchestrator::BatchOrchestrator;
pub use types::{BatchReport, BatchRequest};
