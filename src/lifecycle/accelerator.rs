//! Accelerator memory discovery.
//!
//! `NvidiaSmiProbe` shells out to `nvidia-smi`. `FixedAccelerator` reports a configured
//! size and `NoAccelerator` reports nothing (CPU-only hosts, tests).

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::config::LifecycleConfig;

const BYTES_PER_MIB: u64 = 1024 * 1024;
/// Bytes per GiB.
pub const BYTES_PER_GIB: u64 = 1024 * BYTES_PER_MIB;
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Memory of the first accelerator.
pub struct AcceleratorMemory {
    pub total_bytes: u64,
    pub free_bytes: u64,
}

impl AcceleratorMemory {
    pub fn from_gib(total: f64, free: f64) -> Self {
        Self {
            total_bytes: (total * BYTES_PER_GIB as f64) as u64,
            free_bytes: (free * BYTES_PER_GIB as f64) as u64,
        }
    }

    pub fn total_gib(&self) -> f64 {
        self.total_bytes as f64 / BYTES_PER_GIB as f64
    }

    pub fn free_gib(&self) -> f64 {
        self.free_bytes as f64 / BYTES_PER_GIB as f64
    }
}

#[async_trait]
/// Source of accelerator memory figures.
pub trait AcceleratorInfo: Send + Sync {
    /// Returns `None` when no accelerator is available.
    async fn memory(&self) -> Option<AcceleratorMemory>;
}

/// Queries the first GPU through `nvidia-smi`.
pub struct NvidiaSmiProbe {
    program: PathBuf,
}

impl NvidiaSmiProbe {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl AcceleratorInfo for NvidiaSmiProbe {
    async fn memory(&self) -> Option<AcceleratorMemory> {
        let mut cmd = Command::new(&self.program);
        cmd.args([
            "--query-gpu=memory.total,memory.free",
            "--format=csv,noheader,nounits",
        ])
        .kill_on_drop(true)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                debug!(error = %e, "nvidia-smi unavailable, assuming no accelerator");
                return None;
            }
        };

        let output = match tokio::time::timeout(PROBE_TIMEOUT, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(error = %e, "nvidia-smi failed");
                return None;
            }
            Err(_) => {
                warn!(timeout = ?PROBE_TIMEOUT, "nvidia-smi timed out");
                return None;
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(stderr = %stderr, "nvidia-smi exited with an error");
            return None;
        }

        parse_nvidia_smi(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parses `memory.total, memory.free` (MiB, no units) from the first output line.
pub fn parse_nvidia_smi(stdout: &str) -> Option<AcceleratorMemory> {
    let line = stdout.lines().map(str::trim).find(|l| !l.is_empty())?;
    let mut fields = line.split(',').map(str::trim);
    let total_mib: u64 = fields.next()?.parse().ok()?;
    let free_mib: u64 = fields.next()?.parse().ok()?;
    if total_mib == 0 {
        return None;
    }
    Some(AcceleratorMemory {
        total_bytes: total_mib * BYTES_PER_MIB,
        free_bytes: free_mib.min(total_mib) * BYTES_PER_MIB,
    })
}

/// Reports a fixed memory size.
pub struct FixedAccelerator {
    memory: AcceleratorMemory,
}

impl FixedAccelerator {
    pub fn new(memory: AcceleratorMemory) -> Self {
        Self { memory }
    }

    /// A fully free accelerator of `total_gib`.
    pub fn gib(total_gib: f64) -> Self {
        Self::new(AcceleratorMemory::from_gib(total_gib, total_gib))
    }
}

#[async_trait]
impl AcceleratorInfo for FixedAccelerator {
    async fn memory(&self) -> Option<AcceleratorMemory> {
        Some(self.memory)
    }
}

/// CPU-only host.
pub struct NoAccelerator;

#[async_trait]
impl AcceleratorInfo for NoAccelerator {
    async fn memory(&self) -> Option<AcceleratorMemory> {
        None
    }
}

/// Builds the [`AcceleratorInfo`] implementation for the config.
pub fn build_accelerator(config: &LifecycleConfig) -> Arc<dyn AcceleratorInfo> {
    match config.accelerator_memory_gb {
        Some(gb) => Arc::new(FixedAccelerator::gib(gb)),
        None => Arc::new(NvidiaSmiProbe::new(config.nvidia_smi_path.clone())),
    }
}
