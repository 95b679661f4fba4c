// =============================================================================
// Shared Application State
// =============================================================================
//
// Deliberately thin: the gateway holds no mutable state between requests.
// Each request opens and closes its own terminal session, so the only things
// shared are the configuration and the terminal handle itself (which is just
// an HTTP client plus a base URL).
// =============================================================================

use std::sync::Arc;

use crate::runtime_config::GatewayConfig;
use crate::terminal::TerminalApi;

/// State shared across request handlers via `Arc<AppState>`.
pub struct AppState {
    pub config: GatewayConfig,
    pub terminal: Arc<dyn TerminalApi>,
}

impl AppState {
    pub fn new(config: GatewayConfig, terminal: Arc<dyn TerminalApi>) -> Self {
        Self { config, terminal }
    }
}
