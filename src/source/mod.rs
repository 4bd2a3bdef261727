// =============================================================================
// Snapshot Sources
// =============================================================================
//
// Where the market rows come from. The indicator engine never performs I/O;
// the binary picks one source, fetches a batch per poll and hands the rows
// to `report::build_report`.
//
// - REST: the hosted backend table over its PostgREST-style endpoint.
// - File: a JSON array of rows on disk (offline runs, fixtures).

pub mod file;
pub mod rest;

use std::future::Future;

use anyhow::{bail, Result};

use crate::types::SnapshotRow;

pub use file::FileSource;
pub use rest::RestSource;

/// A provider of snapshot rows.
pub trait SnapshotSource {
    /// Short label used in log lines.
    fn name(&self) -> &str;

    /// Fetch the current batch of rows.
    fn fetch_rows(&self) -> impl Future<Output = Result<Vec<SnapshotRow>>> + Send;
}

/// The source selected at startup.
pub enum AnySource {
    Rest(RestSource),
    File(FileSource),
}

impl AnySource {
    /// Pick a source from the environment.
    ///
    /// `ETF_ALPHA_SNAPSHOT_FILE` wins when set; otherwise `ETF_ALPHA_REST_URL`
    /// and `ETF_ALPHA_API_KEY` configure the REST source.
    pub fn from_env(table: &str) -> Result<Self> {
        if let Ok(path) = std::env::var("ETF_ALPHA_SNAPSHOT_FILE") {
            return Ok(Self::File(FileSource::new(path)));
        }

        let base_url = std::env::var("ETF_ALPHA_REST_URL").unwrap_or_default();
        if base_url.trim().is_empty() {
            bail!("neither ETF_ALPHA_SNAPSHOT_FILE nor ETF_ALPHA_REST_URL is set");
        }
        let api_key = std::env::var("ETF_ALPHA_API_KEY").unwrap_or_default();
        Ok(Self::Rest(RestSource::new(base_url, api_key, table)?))
    }
}

impl SnapshotSource for AnySource {
    fn name(&self) -> &str {
        match self {
            Self::Rest(s) => s.name(),
            Self::File(s) => s.name(),
        }
    }

    async fn fetch_rows(&self) -> Result<Vec<SnapshotRow>> {
        match self {
            Self::Rest(s) => s.fetch_rows().await,
            Self::File(s) => s.fetch_rows().await,
        }
    }
}
