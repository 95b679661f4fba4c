// =============================================================================
// MetaTrader 5 terminal access
// =============================================================================
//
// The terminal is consumed through exactly four operations: open a session,
// resolve an instrument, fetch the last N candles, close the session. The
// traits below are that surface and nothing more; `bridge` is the production
// implementation speaking to the terminal's local HTTP bridge.
//
// A `TerminalSession` is owned by a single request for its whole lifetime.
// `shutdown` consumes the session, so a closed session cannot be reused.
// =============================================================================

pub mod bridge;
#[cfg(test)]
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::Timeframe;

pub use bridge::BridgeTerminal;

/// Instrument metadata as reported by the terminal's symbol registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    #[serde(default)]
    pub digits: u32,
    #[serde(default)]
    pub point: f64,
    #[serde(default)]
    pub description: Option<String>,
}

/// One raw rate record from the terminal, as delivered by
/// `copy_rates_from_pos`. Epoch seconds plus OHLC and the three volume-ish
/// fields the terminal tracks; only `tick_volume` surfaces in gateway output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawRate {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub tick_volume: u64,
    #[serde(default)]
    pub spread: i32,
    #[serde(default)]
    pub real_volume: u64,
}

/// Entry point to the terminal: opens sessions.
#[async_trait]
pub trait TerminalApi: Send + Sync {
    /// Open a new session. An `Err` here means the terminal is unreachable;
    /// no session exists and nothing needs releasing.
    async fn connect(&self) -> Result<Box<dyn TerminalSession>>;
}

/// One open terminal session, scoped to a single request.
#[async_trait]
pub trait TerminalSession: Send + Sync {
    /// Resolve an instrument. `Ok(None)` means the symbol is unknown to the
    /// terminal, which is an expected outcome rather than an error.
    async fn symbol_info(&self, symbol: &str) -> Result<Option<SymbolInfo>>;

    /// Fetch `count` rates for `(symbol, timeframe)` starting `start_pos`
    /// candles back from the most recent one.
    ///
    /// `Err` means the terminal produced no data structure at all (a hard
    /// failure). `Ok` with an empty vector means the request was valid but no
    /// candles exist in the window; the two outcomes stay distinct.
    async fn copy_rates_from_pos(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start_pos: u32,
        count: u32,
    ) -> Result<Vec<RawRate>>;

    /// Close the session. Consumes it.
    async fn shutdown(self: Box<Self>) -> Result<()>;
}
