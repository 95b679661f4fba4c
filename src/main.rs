// =============================================================================
// MT5 Data Gateway — Main Entry Point
// =============================================================================
//
// A stateless HTTP gateway in front of a locally running MetaTrader 5
// terminal: one data endpoint, one backend, one terminal session per request.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod error;
mod market_data;
mod runtime_config;
mod terminal;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::GatewayConfig;
use crate::terminal::BridgeTerminal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("MT5 Data Gateway starting up");

    let mut config = GatewayConfig::load("gateway_config.json").unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        GatewayConfig::default()
    });

    // Env overrides win over the config file.
    if let Ok(url) = std::env::var("MT5_BRIDGE_URL") {
        config.bridge_url = url;
    }
    if let Ok(addr) = std::env::var("MT5_GATEWAY_BIND_ADDR") {
        config.bind_addr = addr;
    }

    info!(bridge_url = %config.bridge_url, "Configured terminal bridge");

    // ── 2. Build shared state ────────────────────────────────────────────
    let terminal = Arc::new(BridgeTerminal::new(
        &config.bridge_url,
        config.request_timeout(),
    ));
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, terminal));

    // ── 3. Serve until shutdown ──────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("MT5 Data Gateway shut down complete.");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => warn!("Shutdown signal received, stopping gracefully"),
        Err(e) => warn!(error = %e, "failed to listen for shutdown signal"),
    }
}
