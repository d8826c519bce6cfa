use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default pause after an unload before the next load is accepted.
pub const DEFAULT_UNLOAD_SETTLE_MS: u64 = 1_000;
/// Default `nvidia-smi` binary (resolved through `PATH`).
pub const DEFAULT_NVIDIA_SMI: &str = "nvidia-smi";

#[derive(Debug, Clone)]
/// Model lifecycle configuration.
pub struct LifecycleConfig {
    /// Pause after releasing a model so the accelerator can reclaim memory.
    pub unload_settle: Duration,
    /// Fixed accelerator size in GiB; skips probing when set.
    pub accelerator_memory_gb: Option<f64>,
    /// Binary used to probe accelerator memory.
    pub nvidia_smi_path: PathBuf,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            unload_settle: Duration::from_millis(DEFAULT_UNLOAD_SETTLE_MS),
            accelerator_memory_gb: None,
            nvidia_smi_path: PathBuf::from(DEFAULT_NVIDIA_SMI),
        }
    }
}

impl LifecycleConfig {
    const ENV_UNLOAD_SETTLE_MS: &'static str = "PROFALIGN_UNLOAD_SETTLE_MS";
    const ENV_ACCELERATOR_MEMORY_GB: &'static str = "PROFALIGN_ACCELERATOR_MEMORY_GB";
    const ENV_NVIDIA_SMI: &'static str = "PROFALIGN_NVIDIA_SMI";

    /// Loads config from environment variables (with defaults).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let unload_settle = env::var(Self::ENV_UNLOAD_SETTLE_MS)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.unload_settle);
        let accelerator_memory_gb = env::var(Self::ENV_ACCELERATOR_MEMORY_GB)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|gb| gb.is_finite() && *gb > 0.0);
        let nvidia_smi_path = env::var(Self::ENV_NVIDIA_SMI)
            .map(PathBuf::from)
            .unwrap_or(defaults.nvidia_smi_path);

        Self {
            unload_settle,
            accelerator_memory_gb,
            nvidia_smi_path,
        }
    }

    /// No settle delay and a fixed 8 GiB accelerator.
    pub fn for_testing() -> Self {
        Self {
            unload_settle: Duration::ZERO,
            accelerator_memory_gb: Some(8.0),
            nvidia_smi_path: PathBuf::from(DEFAULT_NVIDIA_SMI),
        }
    }
}
