// =============================================================================
// Market data error taxonomy and HTTP status mapping
// =============================================================================
//
// Every failure a request can hit maps to exactly one variant here, and each
// variant maps 1:1 to an HTTP status. Messages are part of the API contract
// and are returned verbatim in the `{"error": "..."}` body.
// =============================================================================

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Failure modes of a single market data request, after validation has passed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketDataError {
    /// The terminal session could not be opened at all.
    #[error("Could not connect to MetaTrader 5 terminal.")]
    Connection,

    /// The instrument is unknown to the terminal.
    #[error("Symbol {symbol} not found.")]
    SymbolNotFound { symbol: String },

    /// The timeframe code is outside the fixed nine-code set.
    #[error("Invalid timeframe: {timeframe}.")]
    InvalidTimeframe { timeframe: String },

    /// The terminal returned no data structure for the request. Also the
    /// catch-all for unclassified backend failures (e.g. a session that opens
    /// but is not logged into a trading account).
    #[error("Could not fetch data for {symbol} on {timeframe}.")]
    Fetch { symbol: String, timeframe: String },
}

impl MarketDataError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Connection => StatusCode::SERVICE_UNAVAILABLE,
            Self::SymbolNotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidTimeframe { .. } => StatusCode::BAD_REQUEST,
            Self::Fetch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MarketDataError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_verbatim() {
        assert_eq!(
            MarketDataError::Connection.to_string(),
            "Could not connect to MetaTrader 5 terminal."
        );
        assert_eq!(
            MarketDataError::SymbolNotFound {
                symbol: "FAKESYM".into()
            }
            .to_string(),
            "Symbol FAKESYM not found."
        );
        assert_eq!(
            MarketDataError::InvalidTimeframe {
                timeframe: "XYZ".into()
            }
            .to_string(),
            "Invalid timeframe: XYZ."
        );
        assert_eq!(
            MarketDataError::Fetch {
                symbol: "EURUSD".into(),
                timeframe: "H1".into()
            }
            .to_string(),
            "Could not fetch data for EURUSD on H1."
        );
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            MarketDataError::Connection.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            MarketDataError::SymbolNotFound { symbol: "X".into() }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            MarketDataError::InvalidTimeframe {
                timeframe: "X".into()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            MarketDataError::Fetch {
                symbol: "X".into(),
                timeframe: "Y".into()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
