// =============================================================================
// Snapshot Summary — headline KPIs over the latest market rows
// =============================================================================
//
// Cleaning keeps only rows whose price is finite and strictly positive. The
// summary then reports the row and asset counts, the mean price, the symbol
// with the widest intraday range (day_high - day_low) and a top-N ranking by
// price.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::types::SnapshotRow;

/// One entry of the top-by-price ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRank {
    pub symbol: String,
    pub price: f64,
}

/// Symbol with the widest intraday range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityLeader {
    pub symbol: String,
    pub range: f64,
}

/// Headline figures for a batch of snapshot rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotSummary {
    pub row_count: usize,
    pub asset_count: usize,
    /// NaN when no row survived cleaning.
    pub mean_price: f64,
    pub most_volatile: Option<VolatilityLeader>,
    pub top_by_price: Vec<PriceRank>,
}

/// Drop rows whose price is non-finite or not strictly positive.
pub fn clean_rows(rows: &[SnapshotRow]) -> Vec<SnapshotRow> {
    rows.iter()
        .filter(|r| r.price.is_finite() && r.price > 0.0)
        .cloned()
        .collect()
}

/// Most recent row per symbol, in symbol order. Ties on `ingested_at` keep
/// the row that appears last in the batch.
pub fn latest_per_symbol(rows: &[SnapshotRow]) -> Vec<SnapshotRow> {
    let mut latest: HashMap<&str, &SnapshotRow> = HashMap::new();
    for row in rows {
        match latest.get(row.symbol.as_str()) {
            Some(current) if current.ingested_at > row.ingested_at => {}
            _ => {
                latest.insert(row.symbol.as_str(), row);
            }
        }
    }
    let mut out: Vec<SnapshotRow> = latest.into_values().cloned().collect();
    out.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    out
}

impl SnapshotSummary {
    /// Summarise the newest usable row of every symbol in a raw batch.
    ///
    /// Cleaning runs first, so a symbol whose newest row has a bad price is
    /// represented by its latest valid row instead of dropping out.
    pub fn from_batch(rows: &[SnapshotRow], top_n: usize) -> Self {
        Self::from_rows(&latest_per_symbol(&clean_rows(rows)), top_n)
    }

    /// Summarise `rows` after cleaning.
    pub fn from_rows(rows: &[SnapshotRow], top_n: usize) -> Self {
        let rows = clean_rows(rows);

        let asset_count = rows
            .iter()
            .map(|r| r.symbol.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        let mean_price = if rows.is_empty() {
            f64::NAN
        } else {
            rows.iter().map(|r| r.price).sum::<f64>() / rows.len() as f64
        };

        // First row wins on equal ranges.
        let most_volatile = rows
            .iter()
            .filter(|r| r.intraday_range().is_finite())
            .fold(None::<&SnapshotRow>, |best, r| match best {
                Some(b) if b.intraday_range() >= r.intraday_range() => Some(b),
                _ => Some(r),
            })
            .map(|r| VolatilityLeader {
                symbol: r.symbol.clone(),
                range: r.intraday_range(),
            });

        let mut ranked: Vec<PriceRank> = rows
            .iter()
            .map(|r| PriceRank {
                symbol: r.symbol.clone(),
                price: r.price,
            })
            .collect();
        ranked.sort_by(|a, b| b.price.total_cmp(&a.price));
        ranked.truncate(top_n);

        Self {
            row_count: rows.len(),
            asset_count,
            mean_price,
            most_volatile,
            top_by_price: ranked,
        }
    }
}
