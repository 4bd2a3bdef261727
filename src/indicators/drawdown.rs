// =============================================================================
// Running Maximum & Drawdown
// =============================================================================
//
//   rolling_max[i]  = max(price[0..=i])
//   drawdown_pct[i] = (price[i] - rolling_max[i]) / rolling_max[i] * 100
//
// Drawdown is always <= 0 and exactly 0 at every new peak. A running maximum
// that is zero or negative has no meaningful percentage and yields NaN.

use serde::Serialize;

/// Running peak and the percentage distance below it at one index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawdownPoint {
    pub rolling_max: f64,
    pub drawdown_pct: f64,
}

/// Compute the running maximum and drawdown for one symbol's prices.
pub fn compute_drawdown(prices: &[f64]) -> Vec<DrawdownPoint> {
    let mut result = Vec::with_capacity(prices.len());
    let mut peak = f64::NEG_INFINITY;

    for &price in prices {
        if price > peak {
            peak = price;
        }
        let drawdown_pct = if peak <= 0.0 {
            f64::NAN
        } else {
            (price - peak) / peak * 100.0
        };
        result.push(DrawdownPoint {
            rolling_max: peak,
            drawdown_pct,
        });
    }

    result
}

/// Most negative drawdown over the window. NaN entries are skipped; an empty
/// or all-NaN window yields NaN.
pub fn max_drawdown(drawdown_pct: &[f64]) -> f64 {
    drawdown_pct
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.min(v))))
        .unwrap_or(f64::NAN)
}
