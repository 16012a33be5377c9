//! Server startup

use crate::routes::create_router;
use crate::state::AppState;
use anyhow::{Context, Result};
use reqlens_core::{Config, Pipelines};

/// Build pipelines from `config` and serve until Ctrl-C
pub async fn start_server(config: &Config) -> Result<()> {
    let pipelines = Pipelines::from_config(config)?;
    serve(AppState::new(pipelines), &config.server.bind).await
}

/// Serve an already assembled state on `bind`
pub async fn serve(state: AppState, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind to {}", bind))?;

    let addr = listener.local_addr()?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
