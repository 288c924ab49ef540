//! Serve command implementation
//!
//! This module implements the `serve` command, which runs the HTTP service
//! until a shutdown signal arrives.

use crate::config::load_config_or_default;
use crate::domain::NovaError;
use crate::http::{AppState, HttpServer};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the configured listen host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the configured listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command
    ///
    /// A missing configuration file is not an error; defaults and `NOVA_*`
    /// overrides apply. An unreachable store is not an error either: the
    /// service starts and store-backed requests answer 503 until it recovers.
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ Failed to load configuration");
                eprintln!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        let state = match AppState::from_config(&config) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize services");
                eprintln!("❌ Failed to initialize services");
                eprintln!("   Error: {e}");
                return Ok(2);
            }
        };

        match state.store.ensure_schema().await {
            Ok(()) => tracing::info!(
                database = %state.store.database_name(),
                "Document store ready"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                "Document store not ready; store-backed requests will fail until it is"
            ),
        }

        let server = HttpServer::new(config.server.clone(), state);
        tracing::info!(
            address = %server.socket_addr(),
            environment = ?config.environment,
            "Starting Nova Intake"
        );

        match server.serve(shutdown_signal).await {
            Ok(()) => Ok(0),
            Err(e @ NovaError::Configuration(_)) => {
                eprintln!("❌ {e}");
                Ok(2)
            }
            Err(e) => {
                tracing::error!(error = %e, "HTTP server failed");
                eprintln!("❌ HTTP server failed");
                eprintln!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }
}
