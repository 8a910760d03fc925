//! HTTP gateway for LLM document analysis.
//!
//! Serves the analysis, history, settings and health endpoints plus the
//! bundled frontend.

mod config;
mod error;
mod middleware;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use analyzer::{AnalysisService, AnalyzerConfig, HistoryWriter};
use database::Database;
use openai_provider::{OpenAiConfig, OpenAiProvider};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

/// How long shutdown waits for queued history records.
const HISTORY_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,api=debug,analyzer=debug")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let analyzer_config = AnalyzerConfig::from_env();
    info!(addr = %config.addr, "Starting analysis gateway");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let (writer, worker) = HistoryWriter::spawn(db.clone(), analyzer_config.history_queue_capacity);

    // A missing key only disables /api/chat
    let (analyzer, openai_timeout) = match OpenAiConfig::from_env().and_then(|c| {
        let timeout = c.timeout;
        OpenAiProvider::new(c).map(|provider| (provider, timeout))
    }) {
        Ok((provider, timeout)) => {
            let service = AnalysisService::new(Arc::new(provider), analyzer_config, writer);
            (Some(Arc::new(service)), timeout)
        }
        Err(e) => {
            warn!("OpenAI provider not configured, /api/chat will answer 503: {}", e);
            (None, OpenAiConfig::default().timeout)
        }
    };

    let state = AppState::new(db.clone(), analyzer, config.clone(), openai_timeout);
    let app = routes::app(state);

    // Start server
    info!(addr = %config.addr, static_dir = %config.static_dir.display(), "Analysis gateway listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, draining history writer");
    worker.drain(HISTORY_DRAIN_TIMEOUT).await;
    db.close().await;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                warn!("Failed to install signal handlers, falling back to Ctrl-C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("Shutdown signal received");
}
