// =============================================================================
// Terminal HTTP bridge client
// =============================================================================
//
// The MT5 terminal exposes its data API through a local HTTP bridge that wraps
// every reply in a `{"result": ...}` / `{"error": "..."}` envelope. This
// client speaks that envelope and nothing else; the rest of the gateway only
// sees the `TerminalApi` / `TerminalSession` traits.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::terminal::{RawRate, SymbolInfo, TerminalApi, TerminalSession};
use crate::types::Timeframe;

/// Reply envelope used by the terminal bridge for every endpoint.
///
/// `Error` is listed first so that untagged deserialization never mistakes an
/// error reply for a success carrying an optional (nullable) result.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BridgeResponse<T> {
    Error { error: String },
    Success { result: T },
}

impl<T> BridgeResponse<T> {
    fn into_result(self) -> Result<T> {
        match self {
            Self::Success { result } => Ok(result),
            Self::Error { error } => anyhow::bail!("terminal bridge error: {error}"),
        }
    }
}

/// One bridge call: request, status check, envelope unwrap.
async fn call<T: DeserializeOwned>(
    client: &reqwest::Client,
    base_url: &str,
    method: reqwest::Method,
    path: &str,
    query: &[(&str, String)],
) -> Result<T> {
    let url = format!("{base_url}{path}");

    let resp = client
        .request(method, &url)
        .query(query)
        .send()
        .await
        .with_context(|| format!("request to terminal bridge {path} failed"))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("terminal bridge {path} returned {status}: {body}");
    }

    let envelope: BridgeResponse<T> = resp
        .json()
        .await
        .with_context(|| format!("failed to parse terminal bridge {path} response"))?;

    envelope.into_result()
}

/// Client for the terminal's local HTTP bridge.
#[derive(Debug, Clone)]
pub struct BridgeTerminal {
    base_url: String,
    client: reqwest::Client,
}

impl BridgeTerminal {
    /// Create a new bridge client.
    ///
    /// `base_url` is the bridge root, e.g. `http://127.0.0.1:5001`. The same
    /// timeout applies to every bridge call.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build reqwest client");

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "BridgeTerminal initialised");

        Self { base_url, client }
    }
}

#[async_trait]
impl TerminalApi for BridgeTerminal {
    async fn connect(&self) -> Result<Box<dyn TerminalSession>> {
        let initialised: bool = call(
            &self.client,
            &self.base_url,
            reqwest::Method::POST,
            "/initialize",
            &[],
        )
        .await?;

        if !initialised {
            anyhow::bail!("terminal initialize returned false");
        }

        debug!("terminal session opened");
        Ok(Box::new(BridgeSession {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
        }))
    }
}

/// One open session against the bridge. The bridge holds the actual terminal
/// connection between `/initialize` and `/shutdown`.
struct BridgeSession {
    base_url: String,
    client: reqwest::Client,
}

#[async_trait]
impl TerminalSession for BridgeSession {
    async fn symbol_info(&self, symbol: &str) -> Result<Option<SymbolInfo>> {
        // The bridge reports an unknown symbol as `{"result": null}`.
        call(
            &self.client,
            &self.base_url,
            reqwest::Method::GET,
            "/symbol_info",
            &[("symbol", symbol.to_string())],
        )
        .await
    }

    async fn copy_rates_from_pos(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start_pos: u32,
        count: u32,
    ) -> Result<Vec<RawRate>> {
        // A null result here is the terminal's hard-failure signal, distinct
        // from an empty array (valid request, no data in the window).
        let rates: Option<Vec<RawRate>> = call(
            &self.client,
            &self.base_url,
            reqwest::Method::GET,
            "/copy_rates_from_pos",
            &[
                ("symbol", symbol.to_string()),
                ("timeframe", timeframe.as_str().to_string()),
                ("start_pos", start_pos.to_string()),
                ("count", count.to_string()),
            ],
        )
        .await?;

        rates.context("terminal returned no data structure for copy_rates_from_pos")
    }

    async fn shutdown(self: Box<Self>) -> Result<()> {
        let _: bool = call(
            &self.client,
            &self.base_url,
            reqwest::Method::POST,
            "/shutdown",
            &[],
        )
        .await?;
        debug!("terminal session closed");
        Ok(())
    }
}
