// =============================================================================
// ETF Alpha — rolling technical indicators for ETF market snapshots
// =============================================================================
//
// Library surface:
//   - indicators  RSI, running max / drawdown, peer correlation
//   - risk        Sharpe ratio
//   - signal      RSI band classification
//   - series      per-symbol validation (the only place input is rejected)
//   - snapshot    headline KPIs over the latest rows
//   - report      the full rows -> report pipeline
//   - source      where rows come from (REST table, JSON file)
// =============================================================================

pub mod error;
pub mod indicators;
pub mod report;
pub mod risk;
pub mod runtime_config;
pub mod series;
pub mod signal;
pub mod snapshot;
pub mod source;
pub mod types;

pub use error::SeriesError;
pub use indicators::{
    compute_correlation_matrix, compute_drawdown, compute_rsi, max_drawdown, CorrelationMatrix,
    DrawdownPoint,
};
pub use report::{build_report, MarketReport, SymbolReport};
pub use risk::{annualize_sharpe, compute_sharpe};
pub use runtime_config::RuntimeConfig;
pub use series::{partition_by_symbol, Series, TimedReturn};
pub use signal::{classify_signal, SignalThresholds};
pub use types::{IndicatorRow, PricePoint, Signal, SnapshotRow};
