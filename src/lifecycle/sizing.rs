//! Resource sizing heuristics applied on every load.

use crate::catalog::{ModelDescriptor, ParameterClass};
use crate::engine::{DEFAULT_MAX_MODEL_LEN, EngineSpec, Quantization, SamplingConfig};

use super::accelerator::AcceleratorMemory;

/// Utilization when no accelerator is detected.
pub const CPU_FALLBACK_UTILIZATION: f32 = 0.75;
const SMALL_GPU_MAX_GIB: f64 = 6.0;
const MEDIUM_GPU_MAX_GIB: f64 = 12.0;

const LARGE_MODEL_TEMPERATURE: f32 = 0.1;
const SMALL_MODEL_TEMPERATURE: f32 = 0.2;
const TOP_P: f32 = 0.8;
const MAX_TOKENS: u32 = 128;
const REPETITION_PENALTY: f32 = 1.1;

/// Fraction of accelerator memory the engine may claim, by total capacity tier.
///
/// Smaller cards keep proportionally more headroom for the driver and runtime.
pub fn memory_utilization(memory: Option<AcceleratorMemory>) -> f32 {
    let Some(memory) = memory else {
        return CPU_FALLBACK_UTILIZATION;
    };
    let total = memory.total_gib();
    if total <= SMALL_GPU_MAX_GIB {
        0.65
    } else if total <= MEDIUM_GPU_MAX_GIB {
        0.75
    } else {
        0.85
    }
}

/// Sampling parameters for a parameter class.
pub fn sampling_config(class: ParameterClass) -> SamplingConfig {
    let temperature = if class.is_large() {
        LARGE_MODEL_TEMPERATURE
    } else {
        SMALL_MODEL_TEMPERATURE
    };
    SamplingConfig {
        temperature,
        top_p: TOP_P,
        max_tokens: MAX_TOKENS,
        repetition_penalty: REPETITION_PENALTY,
    }
}

/// Engine bring-up parameters for a catalog entry.
pub fn engine_spec(descriptor: &ModelDescriptor, memory: Option<AcceleratorMemory>) -> EngineSpec {
    EngineSpec {
        model_path: descriptor.model_path.to_string(),
        gpu_memory_utilization: memory_utilization(memory),
        max_model_len: DEFAULT_MAX_MODEL_LEN,
        quantization: descriptor.size.is_large().then_some(Quantization::Int8),
    }
}
