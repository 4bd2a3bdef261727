// =============================================================================
// Relative Strength Index (RSI) — simple moving average form
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive prices.
// Step 2 — Split each delta into a gain (max(Δ, 0)) and a loss (max(-Δ, 0)).
// Step 3 — For every index i >= period, average the `period` gains / losses
//          ending at i (plain SMA, each window summed afresh).
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Output is aligned with the input: index i carries the RSI at price i, and
// indices that lack a full window carry NaN.
// =============================================================================

/// Default look-back window.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Compute the RSI series for `prices` over `period` deltas.
///
/// The returned vector always has `prices.len()` entries.
///
/// # Edge cases
/// - `i < period` => NaN (insufficient history, no forward fill).
/// - `period == 0` => every entry is NaN.
/// - Average loss zero with gains => 100.0.
/// - No movement at all => 50.0.
pub fn compute_rsi(prices: &[f64], period: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; prices.len()];
    if period == 0 || prices.len() <= period {
        return result;
    }

    // --- Split deltas into gains and losses ----------------------------------
    // deltas[k] is the move from price k to price k + 1.
    let (gains, losses): (Vec<f64>, Vec<f64>) = prices
        .windows(2)
        .map(|w| {
            let d = w[1] - w[0];
            (d.max(0.0), (-d).max(0.0))
        })
        .unzip();

    let period_f = period as f64;
    for i in period..prices.len() {
        // Deltas ending at price i: indices (i - period)..i in `gains`.
        let window = (i - period)..i;
        let avg_gain = gains[window.clone()].iter().sum::<f64>() / period_f;
        let avg_loss = losses[window].iter().sum::<f64>() / period_f;
        result[i] = rsi_from_averages(avg_gain, avg_loss);
    }

    result
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // Flat market.
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
    }
}
