// =============================================================================
// Shared types used across the MT5 data gateway
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Chart timeframe as understood by the MetaTrader 5 terminal.
///
/// The set is closed: these nine codes are the only valid values, matching the
/// terminal's own timeframe constants. Parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
    W1,
    MN1,
}

impl Timeframe {
    /// Parse a timeframe code, ignoring case. Returns `None` for anything
    /// outside the fixed set.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "M1" => Some(Self::M1),
            "M5" => Some(Self::M5),
            "M15" => Some(Self::M15),
            "M30" => Some(Self::M30),
            "H1" => Some(Self::H1),
            "H4" => Some(Self::H4),
            "D1" => Some(Self::D1),
            "W1" => Some(Self::W1),
            "MN1" => Some(Self::MN1),
            _ => None,
        }
    }

    /// Canonical upper-case code as sent to the terminal bridge.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M1 => "M1",
            Self::M5 => "M5",
            Self::M15 => "M15",
            Self::M30 => "M30",
            Self::H1 => "H1",
            Self::H4 => "H4",
            Self::D1 => "D1",
            Self::W1 => "W1",
            Self::MN1 => "MN1",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single OHLCV candle as returned by the gateway.
///
/// Serializes to exactly `{time, open, high, low, close, volume}` with `time`
/// rendered as `"YYYY-MM-DD HH:MM:SS"` (UTC, second precision). Constructed
/// only by the market data adapter and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candle {
    #[serde(serialize_with = "serialize_candle_time")]
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

fn serialize_candle_time<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&time.format("%Y-%m-%d %H:%M:%S"))
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_all_nine_codes() {
        let codes = ["M1", "M5", "M15", "M30", "H1", "H4", "D1", "W1", "MN1"];
        for code in codes {
            let tf = Timeframe::parse(code).expect("code should parse");
            assert_eq!(tf.as_str(), code);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Timeframe::parse("h1"), Some(Timeframe::H1));
        assert_eq!(Timeframe::parse("mn1"), Some(Timeframe::MN1));
        assert_eq!(Timeframe::parse("m15"), Some(Timeframe::M15));
        assert_eq!(Timeframe::parse("D1"), Some(Timeframe::D1));
    }

    #[test]
    fn parse_rejects_unknown_codes() {
        assert_eq!(Timeframe::parse("XYZ"), None);
        assert_eq!(Timeframe::parse(""), None);
        assert_eq!(Timeframe::parse("M2"), None);
        assert_eq!(Timeframe::parse("H1 "), None);
    }

    #[test]
    fn display_matches_canonical_code() {
        assert_eq!(Timeframe::H4.to_string(), "H4");
        assert_eq!(Timeframe::MN1.to_string(), "MN1");
    }

    #[test]
    fn candle_serializes_expected_field_set() {
        let candle = Candle {
            time: DateTime::from_timestamp(1_704_067_200, 0).unwrap(),
            open: 1.1042,
            high: 1.1055,
            low: 1.1038,
            close: 1.1049,
            volume: 842,
        };
        let value = serde_json::to_value(&candle).unwrap();
        let obj = value.as_object().unwrap();

        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["close", "high", "low", "open", "time", "volume"]);

        assert_eq!(obj["time"], "2024-01-01 00:00:00");
        assert_eq!(obj["volume"], 842);
        assert!((obj["open"].as_f64().unwrap() - 1.1042).abs() < f64::EPSILON);
    }
}
