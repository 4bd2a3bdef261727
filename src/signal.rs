// =============================================================================
// RSI Signal Classification
// =============================================================================
//
//   RSI > overbought  =>  OVERBOUGHT
//   RSI < oversold    =>  OVERSOLD
//   otherwise / NaN   =>  NEUTRAL
//
// Thresholds are configuration so they can be tuned per asset class.

use serde::{Deserialize, Serialize};

use crate::types::Signal;

fn default_overbought() -> f64 {
    70.0
}

fn default_oversold() -> f64 {
    30.0
}

/// RSI bands used by [`classify_signal`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    /// Strictly above this value the asset is overbought.
    #[serde(default = "default_overbought")]
    pub overbought: f64,

    /// Strictly below this value the asset is oversold.
    #[serde(default = "default_oversold")]
    pub oversold: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            overbought: default_overbought(),
            oversold: default_oversold(),
        }
    }
}

impl SignalThresholds {
    /// Bands must be finite, within [0, 100], and not cross.
    pub fn is_valid(&self) -> bool {
        self.oversold.is_finite()
            && self.overbought.is_finite()
            && (0.0..=100.0).contains(&self.oversold)
            && (0.0..=100.0).contains(&self.overbought)
            && self.oversold <= self.overbought
    }
}

/// Classify one RSI reading. NaN (insufficient history) is always neutral.
pub fn classify_signal(rsi: f64, thresholds: &SignalThresholds) -> Signal {
    if rsi > thresholds.overbought {
        Signal::Overbought
    } else if rsi < thresholds.oversold {
        Signal::Oversold
    } else {
        Signal::Neutral
    }
}
