//! Serve command handler.
//!
//! Runs the HTTP API until interrupted.

use super::Engine;
use crate::server::{self, AppState};
use chatbox_core::{config::AppConfig, AppResult};
use clap::Args;

/// Serve the chat API over HTTP
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to bind (default: server.host from config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (default: server.port from config, or PORT)
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let host = self.host.clone().unwrap_or_else(|| config.server.host.clone());
        let port = self.port.unwrap_or(config.server.port);

        let registry = Engine::from_config(config)?.into_registry();
        let app = server::router(AppState { registry });

        let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
        tracing::info!("Listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
