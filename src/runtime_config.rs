// =============================================================================
// Runtime Configuration — indicator windows, signal bands, polling
// =============================================================================
//
// Every tunable of the pipeline lives here. The indicator functions themselves
// take plain arguments; this struct is read once at startup and passed down
// by reference.
//
// Persistence uses an atomic tmp + rename pattern. All fields carry
// `#[serde(default)]` so that adding new fields never breaks loading an older
// config file.
// =============================================================================

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::indicators::DEFAULT_RSI_PERIOD;
use crate::signal::SignalThresholds;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_rsi_period() -> usize {
    DEFAULT_RSI_PERIOD
}

fn default_top_n() -> usize {
    15
}

fn default_poll_interval_secs() -> u64 {
    300
}

fn default_table() -> String {
    "raw_etf_market_data".to_string()
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the indicator pipeline and its poll loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Indicators ---------------------------------------------------------

    /// RSI look-back window in deltas.
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Overbought / oversold RSI bands.
    #[serde(default)]
    pub signal_thresholds: SignalThresholds,

    // --- Risk metrics -------------------------------------------------------

    /// Risk-free rate per observation period, as a fraction.
    #[serde(default)]
    pub risk_free_rate: f64,

    /// Observation periods per year. When set, reports also carry an
    /// annualised Sharpe ratio.
    #[serde(default)]
    pub periods_per_year: Option<f64>,

    // --- Snapshot summary ---------------------------------------------------

    /// Number of symbols listed in the top-by-price ranking.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Restrict the report to these symbols. Empty means every symbol.
    #[serde(default)]
    pub symbols: Vec<String>,

    // --- Data source --------------------------------------------------------

    /// Backend table holding the market snapshots.
    #[serde(default = "default_table")]
    pub table: String,

    /// Seconds between two snapshot fetches.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            signal_thresholds: SignalThresholds::default(),
            risk_free_rate: 0.0,
            periods_per_year: None,
            top_n: default_top_n(),
            symbols: Vec::new(),
            table: default_table(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            rsi_period = config.rsi_period,
            table = %config.table,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.rsi_period == 0 {
            bail!("rsi_period must be at least 1");
        }
        if !self.signal_thresholds.is_valid() {
            bail!(
                "invalid signal thresholds: oversold {} / overbought {}",
                self.signal_thresholds.oversold,
                self.signal_thresholds.overbought
            );
        }
        if !self.risk_free_rate.is_finite() {
            bail!("risk_free_rate must be finite");
        }
        if let Some(p) = self.periods_per_year {
            if !p.is_finite() || p <= 0.0 {
                bail!("periods_per_year must be positive, got {p}");
            }
        }
        if self.poll_interval_secs == 0 {
            bail!("poll_interval_secs must be at least 1");
        }
        if self.table.trim().is_empty() {
            bail!("table must not be empty");
        }
        Ok(())
    }

    /// Whether `symbol` passes the configured symbol filter.
    pub fn tracks(&self, symbol: &str) -> bool {
        self.symbols.is_empty() || self.symbols.iter().any(|s| s.eq_ignore_ascii_case(symbol))
    }
}
