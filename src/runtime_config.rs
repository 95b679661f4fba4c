// =============================================================================
// Gateway Configuration
// =============================================================================
//
// All deployment knobs live here. Every field carries `#[serde(default)]` so
// that a partial config file (or none at all) still produces a working
// configuration; `main.rs` applies environment overrides on top.
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_bridge_url() -> String {
    "http://127.0.0.1:5001".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

// =============================================================================
// GatewayConfig
// =============================================================================

/// Deployment configuration for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Root URL of the terminal's local HTTP bridge.
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,

    /// Timeout applied to every bridge call, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            bridge_url: default_bridge_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read gateway config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse gateway config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            bridge_url = %config.bridge_url,
            "gateway config loaded"
        );

        Ok(config)
    }

    /// Bridge call timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
