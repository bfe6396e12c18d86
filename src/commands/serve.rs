//! `serve` command: run the dashboard API server

use anyhow::{Context, Result};
use std::net::SocketAddr;

use crate::config::Config;
use crate::server::DashboardServer;

/// Run the API server until ctrl-c
pub async fn serve(bind: Option<SocketAddr>) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(addr) = bind {
        config.server.bind_address = addr;
    }

    let server = DashboardServer::new(config).context("Failed to initialize server")?;

    server
        .start_with_shutdown(shutdown_signal())
        .await
        .context("Server exited with an error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install ctrl-c handler: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
