// =============================================================================
// Shared types used across the ETF Alpha indicator engine
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the hosted `raw_etf_market_data` table, as delivered by the
/// data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub symbol: String,
    pub price: f64,
    #[serde(default)]
    pub day_high: f64,
    #[serde(default)]
    pub day_low: f64,
    #[serde(default)]
    pub day_open: f64,
    #[serde(default)]
    pub prev_close: f64,
    #[serde(default)]
    pub change_pct: f64,
    pub ingested_at: DateTime<Utc>,
}

impl SnapshotRow {
    /// Intraday range (`day_high - day_low`).
    pub fn intraday_range(&self) -> f64 {
        self.day_high - self.day_low
    }
}

/// A single price observation for one symbol. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub day_open: f64,
    pub prev_close: f64,
}

impl From<SnapshotRow> for PricePoint {
    fn from(row: SnapshotRow) -> Self {
        Self {
            symbol: row.symbol,
            timestamp: row.ingested_at,
            price: row.price,
            day_high: row.day_high,
            day_low: row.day_low,
            day_open: row.day_open,
            prev_close: row.prev_close,
        }
    }
}

/// Per-timestamp indicator output for one symbol.
///
/// `rsi` is NaN while the RSI window is still filling; `drawdown_pct` is NaN
/// only when the running maximum is zero or negative. NaN serialises as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub rsi: f64,
    pub rolling_max: f64,
    pub drawdown_pct: f64,
}

/// RSI momentum classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Overbought,
    Oversold,
    Neutral,
}

impl Default for Signal {
    fn default() -> Self {
        Self::Neutral
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overbought => write!(f, "OVERBOUGHT"),
            Self::Oversold => write!(f, "OVERSOLD"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_deserialises_with_missing_optional_columns() {
        let json = r#"{ "symbol": "SPY", "price": 512.3, "ingested_at": "2024-03-01T14:30:00Z" }"#;
        let row: SnapshotRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.symbol, "SPY");
        assert!((row.price - 512.3).abs() < 1e-10);
        assert_eq!(row.day_high, 0.0);
        assert_eq!(row.change_pct, 0.0);
    }

    #[test]
    fn row_rejects_non_numeric_price() {
        let json = r#"{ "symbol": "SPY", "price": "n/a", "ingested_at": "2024-03-01T14:30:00Z" }"#;
        assert!(serde_json::from_str::<SnapshotRow>(json).is_err());
    }

    #[test]
    fn price_point_takes_timestamp_from_ingestion() {
        let json = r#"{ "symbol": "QQQ", "price": 440.0, "day_high": 442.5, "day_low": 437.0,
                        "ingested_at": "2024-03-01T14:30:00Z" }"#;
        let row: SnapshotRow = serde_json::from_str(json).unwrap();
        assert!((row.intraday_range() - 5.5).abs() < 1e-10);
        let ts = row.ingested_at;
        let point = PricePoint::from(row);
        assert_eq!(point.timestamp, ts);
        assert_eq!(point.symbol, "QQQ");
    }

    #[test]
    fn signal_serialises_upper_case() {
        assert_eq!(serde_json::to_string(&Signal::Overbought).unwrap(), "\"OVERBOUGHT\"");
        assert_eq!(Signal::Oversold.to_string(), "OVERSOLD");
        assert_eq!(Signal::default(), Signal::Neutral);
    }
}
