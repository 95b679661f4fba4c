// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// Two routes: `/api/data` serves historical candles, `/api/health` reports
// liveness. Validation of the query parameters happens here, before any
// terminal interaction; everything backend-related is classified by the
// market data adapter.
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::app_state::AppState;
use crate::market_data::fetch_market_data;

/// Candle count used when the `candles` parameter is absent.
const DEFAULT_CANDLES: u32 = 100;
/// Upper bound on the candle count a single request may ask for.
const MAX_CANDLES: u32 = 2000;
/// Timeframe used when the `timeframe` parameter is absent.
const DEFAULT_TIMEFRAME: &str = "D1";

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/data", get(market_data))
        .route("/api/health", get(health))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Request validation
// =============================================================================

/// Raw query parameters as they arrive. Everything is an optional string so
/// that malformed values reach our validation instead of axum's generic
/// rejection.
#[derive(Debug, Default, Deserialize)]
struct DataQuery {
    symbol: Option<String>,
    timeframe: Option<String>,
    candles: Option<String>,
}

/// A validated candle request. Timeframe validity itself is terminal
/// knowledge and stays with the adapter; here it is just a defaulted string.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DataRequest {
    symbol: String,
    timeframe: String,
    candles: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValidationError {
    MissingSymbol,
    BadCandleCount,
}

impl ValidationError {
    fn message(self) -> &'static str {
        match self {
            Self::MissingSymbol => "Symbol parameter is required",
            Self::BadCandleCount => "Candles parameter must be a positive integer, max 2000.",
        }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message() });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

impl DataRequest {
    /// Validate raw query parameters. Pure function of its input; no terminal
    /// interaction happens before validation has passed.
    fn from_query(query: DataQuery) -> Result<Self, ValidationError> {
        let symbol = match query.symbol {
            Some(s) if !s.is_empty() => s,
            _ => return Err(ValidationError::MissingSymbol),
        };

        let candles = match query.candles {
            None => DEFAULT_CANDLES,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n > 0 && n <= i64::from(MAX_CANDLES) => n as u32,
                _ => return Err(ValidationError::BadCandleCount),
            },
        };

        let timeframe = query
            .timeframe
            .unwrap_or_else(|| DEFAULT_TIMEFRAME.to_string());

        Ok(Self {
            symbol,
            timeframe,
            candles,
        })
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn market_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DataQuery>,
) -> Response {
    let request = match DataRequest::from_query(query) {
        Ok(request) => request,
        Err(rejection) => {
            warn!(reason = rejection.message(), "rejected candle request");
            return rejection.into_response();
        }
    };

    match fetch_market_data(
        state.terminal.as_ref(),
        &request.symbol,
        &request.timeframe,
        request.candles,
    )
    .await
    {
        Ok(candles) => Json(candles).into_response(),
        Err(e) => {
            warn!(
                symbol = %request.symbol,
                timeframe = %request.timeframe,
                error = %e,
                "candle request failed"
            );
            e.into_response()
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
    bridge_url: String,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
        bridge_url: state.config.bridge_url.clone(),
    })
}
