//! JSON file snapshot source.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use super::SnapshotSource;
use crate::types::SnapshotRow;

/// Reads a JSON array of [`SnapshotRow`] from disk on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_rows(&self) -> Result<Vec<SnapshotRow>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read snapshot file {}", self.path.display()))?;

        let rows: Vec<SnapshotRow> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse snapshot file {}", self.path.display()))?;

        debug!(path = %self.path.display(), rows = rows.len(), "snapshot file loaded");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("etf-alpha-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn loads_rows() {
        let path = temp_file(
            "rows.json",
            r#"[
                { "symbol": "SPY", "price": 510.1, "day_high": 512.0, "day_low": 508.4,
                  "day_open": 509.0, "prev_close": 508.7, "change_pct": 0.27,
                  "ingested_at": "2024-03-01T14:30:00Z" },
                { "symbol": "SPY", "price": 511.0, "ingested_at": "2024-03-01T14:35:00Z" }
            ]"#,
        );
        let rows = FileSource::new(&path).fetch_rows().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol, "SPY");
        assert!((rows[0].change_pct - 0.27).abs() < 1e-10);
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn rejects_malformed_json() {
        let path = temp_file("bad.json", r#"[{ "symbol": "SPY", "price": "abc" }]"#);
        assert!(FileSource::new(&path).fetch_rows().await.is_err());
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn missing_file_errors() {
        let src = FileSource::new("/nonexistent/etf-alpha-rows.json");
        assert!(src.fetch_rows().await.is_err());
    }
}
