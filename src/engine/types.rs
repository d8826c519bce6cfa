use serde::Serialize;

/// Context window requested for every model.
pub const DEFAULT_MAX_MODEL_LEN: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// Sampling parameters for one loaded model. Fixed for the lifetime of the load.
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub repetition_penalty: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantization {
    /// 8-bit weights (bitsandbytes).
    Int8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// What the engine is asked to bring up on load.
pub struct EngineSpec {
    /// Model path / hub name.
    pub model_path: String,
    /// Fraction of accelerator memory the engine may claim.
    pub gpu_memory_utilization: f32,
    /// Maximum context length.
    pub max_model_len: u32,
    pub quantization: Option<Quantization>,
}
