// =============================================================================
// Market data adapter
// =============================================================================
//
// One invocation walks the terminal session through a fixed sequence:
//
//   connect -> resolve symbol -> resolve timeframe -> fetch rates -> close
//
// Any failed step exits early with its error classification, and the session
// (once opened) is shut down exactly once on every path: the fallible body
// runs in `fetch_with_session`, and `fetch_market_data` closes the session
// whatever the body produced.
// =============================================================================

use chrono::DateTime;
use tracing::{debug, error, warn};

use crate::error::MarketDataError;
use crate::terminal::{RawRate, TerminalApi, TerminalSession};
use crate::types::{Candle, Timeframe};

/// Fetch the `count` most recent candles for `(symbol, timeframe)`.
///
/// An empty vector is a success (valid request, no data in the window), never
/// an error.
pub async fn fetch_market_data(
    terminal: &dyn TerminalApi,
    symbol: &str,
    timeframe: &str,
    count: u32,
) -> Result<Vec<Candle>, MarketDataError> {
    let session = match terminal.connect().await {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "could not open terminal session");
            return Err(MarketDataError::Connection);
        }
    };

    let result = fetch_with_session(session.as_ref(), symbol, timeframe, count).await;

    // Session release happens here and only here, on success and failure
    // alike. A shutdown error is logged but does not mask the fetch outcome.
    if let Err(e) = session.shutdown().await {
        warn!(error = %e, "terminal session shutdown failed");
    }

    result
}

async fn fetch_with_session(
    session: &dyn TerminalSession,
    symbol: &str,
    timeframe: &str,
    count: u32,
) -> Result<Vec<Candle>, MarketDataError> {
    let info = match session.symbol_info(symbol).await {
        Ok(Some(info)) => info,
        Ok(None) => {
            warn!(symbol, "symbol not known to terminal");
            return Err(MarketDataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        // A lookup that errors out (rather than reporting "unknown") is an
        // unclassified backend failure, not a missing symbol.
        Err(e) => {
            error!(symbol, error = %e, "symbol lookup failed");
            return Err(MarketDataError::Fetch {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            });
        }
    };
    debug!(symbol = %info.name, digits = info.digits, "symbol resolved");

    let tf = match Timeframe::parse(timeframe) {
        Some(tf) => tf,
        None => {
            warn!(timeframe, "invalid timeframe requested");
            return Err(MarketDataError::InvalidTimeframe {
                timeframe: timeframe.to_string(),
            });
        }
    };

    let rates = match session.copy_rates_from_pos(symbol, tf, 0, count).await {
        Ok(rates) => rates,
        Err(e) => {
            error!(symbol, timeframe = %tf, error = %e, "rate fetch failed");
            return Err(MarketDataError::Fetch {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            });
        }
    };

    if rates.is_empty() {
        debug!(symbol, timeframe = %tf, "no candles in requested window");
        return Ok(Vec::new());
    }

    debug!(symbol, timeframe = %tf, count = rates.len(), "rates fetched");
    Ok(rates.iter().map(to_candle).collect())
}

/// Normalize one terminal rate record. OHLC and tick volume are copied
/// verbatim; the epoch timestamp becomes an absolute UTC time.
fn to_candle(rate: &RawRate) -> Candle {
    Candle {
        time: DateTime::from_timestamp(rate.time, 0).unwrap_or_default(),
        open: rate.open,
        high: rate.high,
        low: rate.low,
        close: rate.close,
        volume: rate.tick_volume,
    }
}
