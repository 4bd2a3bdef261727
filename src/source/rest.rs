// =============================================================================
// REST Snapshot Source — hosted backend table over HTTP
// =============================================================================
//
// The backend exposes each table at `/rest/v1/<table>`. Every request carries
// the project key twice: as the `apikey` header and as a bearer token. The
// key is never logged.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tracing::{debug, instrument};

use super::SnapshotSource;
use crate::types::SnapshotRow;

/// Request timeout; the backend is expected to answer well within it.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Snapshot rows fetched from the hosted table.
#[derive(Clone)]
pub struct RestSource {
    base_url: String,
    table: String,
    client: reqwest::Client,
}

impl RestSource {
    /// Create a new `RestSource`.
    ///
    /// # Arguments
    /// * `base_url` — project URL, e.g. `https://xyz.supabase.co`.
    /// * `api_key`  — project key sent with every request.
    /// * `table`    — table holding the snapshots.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl AsRef<str>,
        table: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.as_ref();

        let mut default_headers = HeaderMap::new();
        if !api_key.is_empty() {
            let mut key =
                HeaderValue::from_str(api_key).context("API key is not a valid header value")?;
            key.set_sensitive(true);
            let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
                .context("API key is not a valid header value")?;
            bearer.set_sensitive(true);
            default_headers.insert("apikey", key);
            default_headers.insert(AUTHORIZATION, bearer);
        }

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        let table = table.into();
        debug!(base_url = %base_url, table = %table, "RestSource initialised");

        Ok(Self {
            base_url,
            table,
            client,
        })
    }

    /// Endpoint returning every row of the table, oldest first.
    pub fn rows_url(&self) -> String {
        format!(
            "{}/rest/v1/{}?select=*&order=ingested_at.asc",
            self.base_url, self.table
        )
    }
}

impl SnapshotSource for RestSource {
    fn name(&self) -> &str {
        "rest"
    }

    /// GET /rest/v1/<table>.
    #[instrument(skip(self), name = "rest::fetch_rows", fields(table = %self.table))]
    async fn fetch_rows(&self) -> Result<Vec<SnapshotRow>> {
        let url = self.rows_url();

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET /rest/v1/{} request failed", self.table))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("GET /rest/v1/{} returned {}: {}", self.table, status, body);
        }

        let rows: Vec<SnapshotRow> = resp
            .json()
            .await
            .context("failed to parse snapshot rows")?;

        debug!(rows = rows.len(), "snapshot rows fetched");
        Ok(rows)
    }
}
