// =============================================================================
// Scripted terminal for tests
// =============================================================================
//
// Stands in for the bridge so the adapter and the HTTP layer can be exercised
// without a live terminal. The script picks one backend behaviour per
// terminal; connect/shutdown counters let tests assert that every invocation
// releases its session exactly once.
// =============================================================================

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::terminal::{RawRate, SymbolInfo, TerminalApi, TerminalSession};
use crate::types::Timeframe;

/// Backend behaviour for one `MockTerminal`.
#[derive(Debug, Clone)]
pub enum Script {
    /// `connect` itself fails.
    ConnectFailure,
    /// Session opens, but every symbol is unknown.
    UnknownSymbol,
    /// Session opens and the symbol resolves, but the rate fetch hard-fails.
    FetchFailure,
    /// Session opens and the fetch returns up to `count` of these rates,
    /// in order.
    Rates(Vec<RawRate>),
}

struct Inner {
    script: Script,
    connects: AtomicUsize,
    shutdowns: AtomicUsize,
    last_count: AtomicU32,
}

pub struct MockTerminal {
    inner: Arc<Inner>,
}

impl MockTerminal {
    pub fn new(script: Script) -> Self {
        Self {
            inner: Arc::new(Inner {
                script,
                connects: AtomicUsize::new(0),
                shutdowns: AtomicUsize::new(0),
                last_count: AtomicU32::new(0),
            }),
        }
    }

    /// Number of sessions successfully opened.
    pub fn connects(&self) -> usize {
        self.inner.connects.load(Ordering::SeqCst)
    }

    /// Number of sessions shut down.
    pub fn shutdowns(&self) -> usize {
        self.inner.shutdowns.load(Ordering::SeqCst)
    }

    /// The `count` argument of the most recent rate fetch.
    pub fn last_requested_count(&self) -> u32 {
        self.inner.last_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TerminalApi for MockTerminal {
    async fn connect(&self) -> Result<Box<dyn TerminalSession>> {
        if matches!(self.inner.script, Script::ConnectFailure) {
            anyhow::bail!("scripted connect failure");
        }
        self.inner.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            inner: self.inner.clone(),
        }))
    }
}

struct MockSession {
    inner: Arc<Inner>,
}

#[async_trait]
impl TerminalSession for MockSession {
    async fn symbol_info(&self, symbol: &str) -> Result<Option<SymbolInfo>> {
        match self.inner.script {
            Script::UnknownSymbol => Ok(None),
            _ => Ok(Some(SymbolInfo {
                name: symbol.to_string(),
                digits: 5,
                point: 0.00001,
                description: None,
            })),
        }
    }

    async fn copy_rates_from_pos(
        &self,
        _symbol: &str,
        _timeframe: Timeframe,
        _start_pos: u32,
        count: u32,
    ) -> Result<Vec<RawRate>> {
        self.inner.last_count.store(count, Ordering::SeqCst);
        match &self.inner.script {
            Script::FetchFailure => anyhow::bail!("scripted fetch failure"),
            Script::Rates(rates) => Ok(rates.iter().take(count as usize).copied().collect()),
            Script::ConnectFailure | Script::UnknownSymbol => Ok(Vec::new()),
        }
    }

    async fn shutdown(self: Box<Self>) -> Result<()> {
        self.inner.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Build a plausible rate record for tests.
pub fn sample_rate(time: i64, close: f64, tick_volume: u64) -> RawRate {
    RawRate {
        time,
        open: close - 0.0005,
        high: close + 0.0010,
        low: close - 0.0012,
        close,
        tick_volume,
        spread: 2,
        real_volume: 0,
    }
}
