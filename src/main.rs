// =============================================================================
// ETF Alpha Terminal — Main Entry Point
// =============================================================================
//
// Polls the snapshot source, rebuilds the indicator report from scratch on
// every tick and logs the headline figures. RSI band breaches are logged at
// WARN for whatever alerting layer tails the logs.
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use etf_alpha::report::{build_report, MarketReport};
use etf_alpha::runtime_config::RuntimeConfig;
use etf_alpha::source::{AnySource, SnapshotSource};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("ETF Alpha Terminal starting");

    let config_path =
        std::env::var("ETF_ALPHA_CONFIG").unwrap_or_else(|_| "etf_alpha_config.json".into());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    // Override symbols from env if available.
    if let Ok(syms) = std::env::var("ETF_ALPHA_SYMBOLS") {
        config.symbols = syms
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }
    config.validate().context("invalid runtime config")?;

    info!(
        rsi_period = config.rsi_period,
        overbought = config.signal_thresholds.overbought,
        oversold = config.signal_thresholds.oversold,
        symbols = ?config.symbols,
        poll_interval_secs = config.poll_interval_secs,
        "Configuration ready"
    );

    // ── 2. Snapshot source ───────────────────────────────────────────────
    let source = AnySource::from_env(&config.table)?;
    info!(source = source.name(), table = %config.table, "Snapshot source selected");

    let report_path = std::env::var("ETF_ALPHA_REPORT_PATH").ok();
    let run_once = std::env::var("ETF_ALPHA_ONCE").is_ok_and(|v| v == "1" || v == "true");

    if run_once {
        return run_cycle(&source, &config, report_path.as_deref()).await;
    }

    // ── 3. Poll loop ─────────────────────────────────────────────────────
    let mut interval = tokio::time::interval(Duration::from_secs(config.poll_interval_secs));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = run_cycle(&source, &config, report_path.as_deref()).await {
                    error!(error = %format!("{e:#}"), "Report cycle failed — retrying next tick");
                }
            }
            _ = &mut shutdown => {
                warn!("Shutdown signal received — stopping");
                break;
            }
        }
    }

    info!("ETF Alpha Terminal shut down complete.");
    Ok(())
}

/// Fetch one batch, build the report, log it and optionally persist it.
async fn run_cycle(
    source: &AnySource,
    config: &RuntimeConfig,
    report_path: Option<&str>,
) -> Result<()> {
    let rows = source.fetch_rows().await?;
    let row_count = rows.len();

    let report = build_report(rows, config).context("snapshot batch rejected")?;
    log_report(&report, row_count);

    if let Some(path) = report_path {
        write_report(&report, Path::new(path))?;
    }
    Ok(())
}

fn log_report(report: &MarketReport, row_count: usize) {
    let summary = &report.summary;
    info!(
        rows = row_count,
        assets = summary.asset_count,
        mean_price = summary.mean_price,
        most_volatile = ?summary.most_volatile.as_ref().map(|v| v.symbol.as_str()),
        "Snapshot summary"
    );

    for sym in &report.symbols {
        info!(
            symbol = %sym.symbol,
            rsi = sym.latest_rsi,
            signal = %sym.signal,
            max_drawdown_pct = sym.max_drawdown_pct,
            sharpe = sym.sharpe,
            "Symbol indicators"
        );
    }

    for sym in report.alerts() {
        warn!(symbol = %sym.symbol, rsi = sym.latest_rsi, signal = %sym.signal, "RSI band breached");
    }
}

/// Atomic write: serialise to a `.tmp` sibling, then rename.
fn write_report(report: &MarketReport, path: &Path) -> Result<()> {
    let content =
        serde_json::to_string_pretty(report).context("failed to serialise market report")?;
    let tmp_path = path.with_extension("json.tmp");

    std::fs::write(&tmp_path, &content)
        .with_context(|| format!("failed to write tmp report to {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to rename tmp report to {}", path.display()))?;

    info!(path = %path.display(), "Market report written");
    Ok(())
}
