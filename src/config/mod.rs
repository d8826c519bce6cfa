//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `PROFALIGN_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::{available_ids, find_model};
use crate::lifecycle::LifecycleConfig;

/// Default generation engine endpoint (an OpenAI-compatible server such as vLLM).
pub const DEFAULT_ENGINE_URL: &str = "http://127.0.0.1:8001";
/// Default engine request timeout. Large batches on small GPUs take minutes.
pub const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 600;
/// Browser origins allowed when `PROFALIGN_CORS_ORIGINS` is not set.
pub const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://localhost:3000",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:3000",
];

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `PROFALIGN_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,

    /// Directory holding the prompt template assets. Default: `./prompts`.
    pub prompts_dir: PathBuf,

    /// Generation engine base URL. Default: [`DEFAULT_ENGINE_URL`].
    pub engine_url: String,

    /// Timeout for one engine request. Default: 600 s.
    pub engine_timeout: Duration,

    /// Catalog id loaded at startup, if any.
    pub default_model: Option<String>,

    /// CORS allow-list.
    pub cors_origins: Vec<String>,

    /// Settle delay and accelerator probing.
    pub lifecycle: LifecycleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            prompts_dir: PathBuf::from("./prompts"),
            engine_url: DEFAULT_ENGINE_URL.to_string(),
            engine_timeout: Duration::from_secs(DEFAULT_ENGINE_TIMEOUT_SECS),
            default_model: None,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            lifecycle: LifecycleConfig::default(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "PROFALIGN_PORT";
    const ENV_BIND_ADDR: &'static str = "PROFALIGN_BIND_ADDR";
    const ENV_PROMPTS_DIR: &'static str = "PROFALIGN_PROMPTS_DIR";
    const ENV_ENGINE_URL: &'static str = "PROFALIGN_ENGINE_URL";
    const ENV_ENGINE_TIMEOUT_SECS: &'static str = "PROFALIGN_ENGINE_TIMEOUT_SECS";
    const ENV_DEFAULT_MODEL: &'static str = "PROFALIGN_DEFAULT_MODEL";
    const ENV_CORS_ORIGINS: &'static str = "PROFALIGN_CORS_ORIGINS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let prompts_dir = Self::parse_path_from_env(Self::ENV_PROMPTS_DIR, defaults.prompts_dir);
        let engine_url = Self::parse_string_from_env(Self::ENV_ENGINE_URL, defaults.engine_url);
        let engine_timeout = Self::parse_timeout_from_env(defaults.engine_timeout)?;
        let default_model = Self::parse_optional_string_from_env(Self::ENV_DEFAULT_MODEL);
        let cors_origins = Self::parse_list_from_env(Self::ENV_CORS_ORIGINS, defaults.cors_origins);

        Ok(Self {
            port,
            bind_addr,
            prompts_dir,
            engine_url,
            engine_timeout,
            default_model,
            cors_origins,
            lifecycle: LifecycleConfig::from_env(),
        })
    }

    /// Checks invariants that parsing alone cannot (does not touch the engine).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prompts_dir.exists() && !self.prompts_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.prompts_dir.clone(),
            });
        }

        if !(self.engine_url.starts_with("http://") || self.engine_url.starts_with("https://")) {
            return Err(ConfigError::InvalidEngineUrl {
                value: self.engine_url.clone(),
            });
        }

        if let Some(ref id) = self.default_model
            && find_model(id).is_none()
        {
            return Err(ConfigError::UnknownDefaultModel {
                model_id: id.clone(),
                available: available_ids(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_timeout_from_env(default: Duration) -> Result<Duration, ConfigError> {
        match env::var(Self::ENV_ENGINE_TIMEOUT_SECS) {
            Ok(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                _ => Err(ConfigError::InvalidTimeout { value }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .map(|v| v.trim().to_string())
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_list_from_env(var_name: &str, default: Vec<String>) -> Vec<String> {
        match env::var(var_name) {
            Ok(value) => value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => default,
        }
    }
}
