// =============================================================================
// Risk-adjusted return metrics
// =============================================================================
//
//   excess[i] = returns[i] - risk_free_rate
//   Sharpe    = mean(excess) / stdev(excess)      (sample, n - 1)
//
// Inputs are fractional periodic returns. The risk-free rate is per period,
// matching the return frequency. Annualisation is opt-in via
// `annualize_sharpe` with a caller-supplied number of periods per year.
// =============================================================================

use tracing::trace;

/// Minimum observations for a sample standard deviation.
const MIN_OBSERVATIONS: usize = 2;

/// Per-period Sharpe ratio of `returns` over `risk_free_rate`.
///
/// Returns NaN when:
/// - Fewer than two observations are supplied.
/// - Any observation is non-finite.
/// - The excess returns have zero spread (flat returns carry no signal).
pub fn compute_sharpe(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.len() < MIN_OBSERVATIONS {
        trace!(len = returns.len(), "Sharpe: insufficient observations");
        return f64::NAN;
    }
    if !risk_free_rate.is_finite() || returns.iter().any(|r| !r.is_finite()) {
        return f64::NAN;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().map(|r| r - risk_free_rate).sum::<f64>() / n;
    let variance = returns
        .iter()
        .map(|r| (r - risk_free_rate - mean).powi(2))
        .sum::<f64>()
        / (n - 1.0);
    let std_dev = variance.sqrt();

    if std_dev < f64::EPSILON {
        trace!("Sharpe: zero dispersion");
        return f64::NAN;
    }

    mean / std_dev
}

/// Scale a per-period Sharpe ratio by `sqrt(periods_per_year)`.
///
/// A non-positive or non-finite period count yields NaN.
pub fn annualize_sharpe(sharpe: f64, periods_per_year: f64) -> f64 {
    if !periods_per_year.is_finite() || periods_per_year <= 0.0 {
        return f64::NAN;
    }
    sharpe * periods_per_year.sqrt()
}
