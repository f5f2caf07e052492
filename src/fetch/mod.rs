// src/fetch/mod.rs

use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::SyncError;

pub mod records;

pub use records::{parse_records, Dataset, Record};

/// GET the published sheet and return its body as text.
///
/// Failures carry the status code at most; the body of a rejected response is
/// never read.
pub async fn fetch_csv(client: &Client, url: &Url) -> Result<String, SyncError> {
    let resp = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| SyncError::fetch(format!("GET {}: {}", url, e)))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(SyncError::fetch(format!("GET {}: HTTP {}", url, status)));
    }

    let text = resp
        .text()
        .await
        .map_err(|e| SyncError::fetch(format!("reading body from {}: {}", url, e)))?;
    debug!(bytes = text.len(), "downloaded sheet CSV");
    Ok(text)
}

/// Fetch the sheet and keep the rows that have both an `id` and a `title`.
#[instrument(level = "info", skip(client, url), fields(url = %url))]
pub async fn fetch_dataset(client: &Client, url: &Url) -> Result<Dataset, SyncError> {
    let text = fetch_csv(client, url).await?;
    let dataset = parse_records(&text);
    info!("📄 fetched {} rows from sheet", dataset.len());
    Ok(dataset)
}
