// =============================================================================
// Market Report — rows in, indicators and risk figures out
// =============================================================================
//
// Pipeline:
//   1. Partition the batch per symbol and validate each series (the only
//      step that can fail).
//   2. Per symbol: RSI, running max / drawdown, latest signal, worst
//      drawdown, Sharpe on simple returns.
//   3. Across symbols: correlation matrix of the return series.
//   4. Snapshot KPIs over the latest valid row of every symbol.
//
// Every step is a pure function of its input; a report is rebuilt from
// scratch on each call.
// =============================================================================

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::SeriesError;
use crate::indicators::{
    compute_correlation_matrix, compute_drawdown, compute_rsi, max_drawdown, CorrelationMatrix,
};
use crate::risk::{annualize_sharpe, compute_sharpe};
use crate::runtime_config::RuntimeConfig;
use crate::series::{partition_by_symbol, Series};
use crate::signal::classify_signal;
use crate::snapshot::SnapshotSummary;
use crate::types::{IndicatorRow, Signal, SnapshotRow};

/// Indicator output and risk figures for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolReport {
    pub symbol: String,
    pub rows: Vec<IndicatorRow>,
    /// RSI at the most recent point (NaN while the window fills).
    pub latest_rsi: f64,
    pub signal: Signal,
    pub max_drawdown_pct: f64,
    pub sharpe: f64,
    pub annualized_sharpe: Option<f64>,
}

/// Full report over one batch of snapshot rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketReport {
    pub generated_at: DateTime<Utc>,
    pub summary: SnapshotSummary,
    pub symbols: Vec<SymbolReport>,
    pub correlation: CorrelationMatrix,
}

impl MarketReport {
    /// Symbols whose latest RSI left the neutral band.
    pub fn alerts(&self) -> impl Iterator<Item = &SymbolReport> {
        self.symbols.iter().filter(|s| s.signal != Signal::Neutral)
    }

    pub fn symbol(&self, symbol: &str) -> Option<&SymbolReport> {
        self.symbols.iter().find(|s| s.symbol == symbol)
    }
}

/// Per-timestamp RSI and drawdown rows for one series.
pub fn compute_indicator_rows(series: &Series, rsi_period: usize) -> Vec<IndicatorRow> {
    let prices = series.prices();
    let rsi = compute_rsi(&prices, rsi_period);
    let drawdown = compute_drawdown(&prices);

    series
        .points()
        .iter()
        .zip(rsi)
        .zip(drawdown)
        .map(|((point, rsi), dd)| IndicatorRow {
            symbol: series.symbol().to_string(),
            timestamp: point.timestamp,
            rsi,
            rolling_max: dd.rolling_max,
            drawdown_pct: dd.drawdown_pct,
        })
        .collect()
}

impl SymbolReport {
    pub fn compute(series: &Series, config: &RuntimeConfig) -> Self {
        let rows = compute_indicator_rows(series, config.rsi_period);

        let latest_rsi = rows.last().map_or(f64::NAN, |r| r.rsi);
        let signal = classify_signal(latest_rsi, &config.signal_thresholds);

        let drawdowns: Vec<f64> = rows.iter().map(|r| r.drawdown_pct).collect();
        let max_drawdown_pct = max_drawdown(&drawdowns);

        let returns: Vec<f64> = series.returns().iter().map(|r| r.value).collect();
        let sharpe = compute_sharpe(&returns, config.risk_free_rate);
        let annualized_sharpe = config
            .periods_per_year
            .map(|p| annualize_sharpe(sharpe, p));

        debug!(
            symbol = %series.symbol(),
            points = rows.len(),
            latest_rsi,
            signal = %signal,
            max_drawdown_pct,
            sharpe,
            "symbol report computed"
        );

        Self {
            symbol: series.symbol().to_string(),
            rows,
            latest_rsi,
            signal,
            max_drawdown_pct,
            sharpe,
            annualized_sharpe,
        }
    }
}

/// Build a [`MarketReport`] from a raw batch.
///
/// Rows for symbols outside the configured filter are ignored. Malformed
/// series reject the whole batch before anything is computed.
pub fn build_report(
    rows: Vec<SnapshotRow>,
    config: &RuntimeConfig,
) -> Result<MarketReport, SeriesError> {
    let rows: Vec<SnapshotRow> = rows
        .into_iter()
        .filter(|r| config.tracks(&r.symbol))
        .collect();
    let summary = SnapshotSummary::from_batch(&rows, config.top_n);

    let partitions = partition_by_symbol(rows)?;

    let symbols: Vec<SymbolReport> = partitions
        .values()
        .map(|series| SymbolReport::compute(series, config))
        .collect();

    let returns_by_symbol: BTreeMap<String, _> = partitions
        .iter()
        .map(|(symbol, series)| (symbol.clone(), series.returns()))
        .collect();
    let correlation = compute_correlation_matrix(&returns_by_symbol);

    Ok(MarketReport {
        generated_at: Utc::now(),
        summary,
        symbols,
        correlation,
    })
}
