// =============================================================================
// Per-symbol price series
// =============================================================================
//
// Every rolling statistic runs on exactly one symbol's history. Rows coming
// from the data source are partitioned by symbol first, ordered by ingestion
// time, and validated here before any indicator sees them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::SeriesError;
use crate::types::{PricePoint, SnapshotRow};

/// A periodic return stamped with the timestamp of the later price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedReturn {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Ordered, validated price history for a single symbol.
///
/// Timestamps are strictly ascending and every price is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    symbol: String,
    points: Vec<PricePoint>,
}

impl Series {
    /// Build a series, rejecting anything that would have to be reordered,
    /// deduplicated or coerced to make sense.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Err(SeriesError::EmptySymbol);
        }

        let mut previous: Option<DateTime<Utc>> = None;
        for point in &points {
            if point.symbol != symbol {
                return Err(SeriesError::SymbolMismatch {
                    expected: symbol,
                    found: point.symbol.clone(),
                });
            }
            if !point.price.is_finite() {
                return Err(SeriesError::NonFinitePrice {
                    symbol,
                    timestamp: point.timestamp,
                });
            }
            if let Some(prev) = previous {
                if point.timestamp == prev {
                    return Err(SeriesError::DuplicateTimestamp {
                        symbol,
                        timestamp: point.timestamp,
                    });
                }
                if point.timestamp < prev {
                    return Err(SeriesError::OutOfOrder {
                        symbol,
                        previous: prev,
                        current: point.timestamp,
                    });
                }
            }
            previous = Some(point.timestamp);
        }

        Ok(Self { symbol, points })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Prices in timestamp order.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// Simple fractional returns `p[i] / p[i-1] - 1`, one per consecutive
    /// pair. A zero previous price yields NaN.
    pub fn returns(&self) -> Vec<TimedReturn> {
        self.points
            .windows(2)
            .map(|w| {
                let prev = w[0].price;
                let value = if prev == 0.0 {
                    f64::NAN
                } else {
                    w[1].price / prev - 1.0
                };
                TimedReturn {
                    timestamp: w[1].timestamp,
                    value,
                }
            })
            .collect()
    }
}

/// Split a batch of rows into one [`Series`] per symbol.
///
/// Rows only need to be orderable: each symbol's rows are sorted by
/// `ingested_at` before validation. Duplicate timestamps are rejected, never
/// dropped.
pub fn partition_by_symbol(rows: Vec<SnapshotRow>) -> Result<BTreeMap<String, Series>, SeriesError> {
    let mut grouped: BTreeMap<String, Vec<PricePoint>> = BTreeMap::new();
    for row in rows {
        grouped
            .entry(row.symbol.clone())
            .or_default()
            .push(PricePoint::from(row));
    }

    let mut out = BTreeMap::new();
    for (symbol, mut points) in grouped {
        points.sort_by_key(|p| p.timestamp);
        debug!(symbol = %symbol, points = points.len(), "series partitioned");
        let series = Series::new(symbol.clone(), points)?;
        out.insert(symbol, series);
    }
    Ok(out)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::types::{PricePoint, SnapshotRow};

    pub fn ts(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap() + Duration::minutes(minute)
    }

    pub fn point(symbol: &str, minute: i64, price: f64) -> PricePoint {
        PricePoint {
            symbol: symbol.to_string(),
            timestamp: ts(minute),
            price,
            day_high: price,
            day_low: price,
            day_open: price,
            prev_close: price,
        }
    }

    pub fn row(symbol: &str, minute: i64, price: f64) -> SnapshotRow {
        SnapshotRow {
            symbol: symbol.to_string(),
            price,
            day_high: price,
            day_low: price,
            day_open: price,
            prev_close: price,
            change_pct: 0.0,
            ingested_at: ts(minute),
        }
    }

    pub fn points(symbol: &str, prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| point(symbol, i as i64, p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn accepts_ordered_series() {
        let s = Series::new("SPY", points("SPY", &[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.symbol(), "SPY");
        assert_eq!(s.prices(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_series_is_valid() {
        let s = Series::new("SPY", Vec::new()).unwrap();
        assert!(s.is_empty());
        assert!(s.returns().is_empty());
    }

    #[test]
    fn rejects_empty_symbol() {
        assert_eq!(Series::new("", Vec::new()), Err(SeriesError::EmptySymbol));
    }

    #[test]
    fn rejects_foreign_symbol() {
        let err = Series::new("SPY", vec![point("QQQ", 0, 1.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::SymbolMismatch { .. }));
    }

    #[test]
    fn rejects_non_finite_price() {
        let err = Series::new("SPY", vec![point("SPY", 0, 1.0), point("SPY", 1, f64::NAN)]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::NonFinitePrice {
                symbol: "SPY".into(),
                timestamp: ts(1)
            }
        );
    }

    #[test]
    fn rejects_duplicate_timestamp() {
        let err = Series::new("SPY", vec![point("SPY", 0, 1.0), point("SPY", 0, 2.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::DuplicateTimestamp { .. }));
    }

    #[test]
    fn rejects_out_of_order() {
        let err = Series::new("SPY", vec![point("SPY", 5, 1.0), point("SPY", 1, 2.0)]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::OutOfOrder {
                symbol: "SPY".into(),
                previous: ts(5),
                current: ts(1)
            }
        );
    }

    #[test]
    fn returns_are_fractional_and_stamped_with_later_point() {
        let s = Series::new("SPY", points("SPY", &[100.0, 110.0, 99.0])).unwrap();
        let r = s.returns();
        assert_eq!(r.len(), 2);
        assert!((r[0].value - 0.10).abs() < 1e-12);
        assert!((r[1].value + 0.10).abs() < 1e-12);
        assert_eq!(r[0].timestamp, ts(1));
    }

    #[test]
    fn return_after_zero_price_is_nan() {
        let s = Series::new("SPY", points("SPY", &[0.0, 5.0])).unwrap();
        assert!(s.returns()[0].value.is_nan());
    }

    #[test]
    fn partition_sorts_each_symbol_and_keeps_them_apart() {
        let rows = vec![
            row("SPY", 2, 3.0),
            row("QQQ", 0, 10.0),
            row("SPY", 0, 1.0),
            row("SPY", 1, 2.0),
        ];
        let parts = partition_by_symbol(rows).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts["SPY"].prices(), vec![1.0, 2.0, 3.0]);
        assert_eq!(parts["QQQ"].prices(), vec![10.0]);
    }

    #[test]
    fn partition_rejects_duplicates_within_symbol() {
        let rows = vec![row("SPY", 0, 1.0), row("SPY", 0, 1.5), row("QQQ", 0, 1.0)];
        assert!(matches!(
            partition_by_symbol(rows),
            Err(SeriesError::DuplicateTimestamp { .. })
        ));
    }
}
