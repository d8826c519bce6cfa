//! Model lifecycle: one model slot, explicit load/unload transitions, resource sizing.

pub mod accelerator;
pub mod config;
pub mod error;
pub mod manager;
pub mod sizing;
pub mod types;


pub use accelerator::{
    AcceleratorInfo, AcceleratorMemory, FixedAccelerator, NoAccelerator, NvidiaSmiProbe,
    build_accelerator, parse_nvidia_smi,
};
pub use config::{DEFAULT_UNLOAD_SETTLE_MS, LifecycleConfig};
pub use error::{LifecycleError, LifecycleResult};
pub use manager::{InferenceSession, ModelManager};
pub use types::{EngineState, EngineStatus, LoadedModel, UnloadOutcome};
