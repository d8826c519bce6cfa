//! Test server harness.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use profalign::{FixedAccelerator, LifecycleConfig, MockEngine, ModelManager, PromptBuilder};
use profalign_server::gateway::{HandlerState, create_router_with_state};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

/// Prompt assets written into the server's template directory.
pub const TEST_TEMPLATES: &[(&str, &str)] = &[
    ("local-system-prompt.txt", "STRICT SYSTEM"),
    (
        "local-user-prompt.txt",
        "Name: {{professor.name}}\nAffiliation: {{professor.affiliation}}\nAreas: {{professor.areas}}\nPublications:\n{{publications}}\nDirection: {{researchDirection}}",
    ),
    ("basic-system-prompt.txt", "BASIC SYSTEM"),
    ("basic-user-prompt.txt", "{{professor.name}} vs {{researchDirection}}"),
];

#[derive(Debug, Clone, Default)]
pub struct TestServerConfig {
    pub port: u16,
    /// Completions returned by position; `None` uses the engine's default completion.
    pub completions: Option<Vec<String>>,
    /// Model loaded before the server starts accepting requests.
    pub preload: Option<String>,
}

impl TestServerConfig {
    pub fn with_completions<I, S>(mut self, completions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.completions = Some(completions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_preload(mut self, model_id: &str) -> Self {
        self.preload = Some(model_id.to_string());
        self
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub engine: Arc<MockEngine>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _temp_dir: TempDir,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

/// Polls `/health` until the server answers 200 or `timeout` passes.
pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let client = reqwest::Client::new();
    let url = format!("http://{addr}/health");
    let deadline = tokio::time::Instant::now() + timeout;

    while tokio::time::Instant::now() < deadline {
        if let Ok(resp) = client.get(&url).send().await
            && resp.status().is_success()
        {
            return Ok(());
        }
        tokio::time::sleep(interval).await;
    }

    Err(ServerStartupError::Timeout)
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// Spawns a server backed by `MockEngine` and templates read from a temp directory.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let port = if config.port == 0 {
        find_available_port().await?
    } else {
        config.port
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let temp_dir = TempDir::new()?;
    for (name, body) in TEST_TEMPLATES {
        std::fs::write(temp_dir.path().join(name), body)?;
    }

    let engine = Arc::new(match config.completions {
        Some(completions) => MockEngine::with_completions(completions),
        None => MockEngine::new(),
    });

    let manager = ModelManager::new(
        LifecycleConfig::for_testing(),
        Arc::clone(&engine) as Arc<dyn profalign::GenerationEngine>,
        Arc::new(FixedAccelerator::gib(8.0)),
    );
    if let Some(model_id) = &config.preload {
        manager
            .load(model_id)
            .await
            .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    }

    let prompts = Arc::new(PromptBuilder::from_dir(temp_dir.path()));
    let state = HandlerState::new(manager, prompts);
    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        engine,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
        _temp_dir: temp_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_available_port() {
        let port = find_available_port()
            .await
            .expect("Should find available port");
        assert!(port > 0);
    }

    #[test]
    fn test_server_config_defaults() {
        let config = TestServerConfig::default();
        assert_eq!(config.port, 0);
        assert!(config.completions.is_none());
        assert!(config.preload.is_none());
    }
}
