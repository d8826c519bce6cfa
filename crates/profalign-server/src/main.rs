//! ProfAlign HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use profalign::config::Config;
use profalign::{HttpEngine, ModelManager, PromptBuilder};
use profalign_server::gateway::{HandlerState, cors_layer, create_router_with_state};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        engine_url = %config.engine_url,
        "ProfAlign starting"
    );

    if !config.prompts_dir.is_dir() {
        tracing::warn!(
            prompts_dir = %config.prompts_dir.display(),
            "Prompt directory not found, built-in templates will be used"
        );
    }

    let engine = Arc::new(HttpEngine::new(
        config.engine_url.clone(),
        config.engine_timeout,
    )?);
    let manager = ModelManager::with_engine(config.lifecycle.clone(), engine);
    let prompts = Arc::new(PromptBuilder::from_dir(config.prompts_dir.clone()));

    if let Some(model_id) = &config.default_model {
        tracing::info!(model_id = %model_id, "Loading default model");
        if let Err(e) = manager.load(model_id).await {
            tracing::warn!("Default model not loaded: {}. Starting unloaded.", e);
        }
    }

    let state = HandlerState::new(manager.clone(), prompts);
    let app = create_router_with_state(state).layer(cors_layer(&config.cors_origins));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(manager))
        .await?;

    tracing::info!("ProfAlign shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("PROFALIGN_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8000);

    let url = format!("http://127.0.0.1:{}/health", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal(manager: ModelManager) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }

    manager.shutdown().await;
}
