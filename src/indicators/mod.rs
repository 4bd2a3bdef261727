// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the per-symbol indicators and the
// cross-symbol correlation matrix. Nothing here returns an error: short
// windows and degenerate denominators come back as NaN so a batch over many
// symbols never aborts on the weakest one.

pub mod correlation;
pub mod drawdown;
pub mod rsi;

pub use correlation::{compute_correlation_matrix, pearson, CorrelationMatrix};
pub use drawdown::{compute_drawdown, max_drawdown, DrawdownPoint};
pub use rsi::{compute_rsi, DEFAULT_RSI_PERIOD};
