//! Page fetching: one HTTP GET per teletext page.
//!
//! ## Why a shared client?
//!
//! `reqwest::Client` keeps a connection pool; building it once per run
//! lets the ~70 sequential page requests reuse the same TLS session
//! instead of handshaking per page. The pipeline never retries — a page
//! that fails now will be fetched again on tomorrow's run anyway.

use crate::config::CaptureConfig;
use crate::error::CaptureError;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

/// Result of fetching one page.
///
/// `Failed` covers any non-200 response; there is no body contract for
/// those, so only the status is kept. Transport-level failures do not
/// appear here — they surface as [`CaptureError::Fetch`].
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// HTTP 200 with the raw response body.
    Ok(Vec<u8>),
    /// Any non-200 status; the page is absent from the document.
    Failed(StatusCode),
}

/// Build the HTTP client for a run.
///
/// A `fetch_timeout_secs` of 0 leaves the client at its library default
/// (no timeout), matching the historical behaviour.
pub fn build_client(config: &CaptureConfig) -> Result<reqwest::Client, CaptureError> {
    let mut builder = reqwest::Client::builder();
    if config.fetch_timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(config.fetch_timeout_secs));
    }
    builder
        .build()
        .map_err(|e| CaptureError::Internal(format!("HTTP client construction failed: {e}")))
}

/// URL of the image resource for one page.
pub fn page_url(config: &CaptureConfig, page: u32) -> String {
    format!(
        "{}?channel={}&page={}",
        config.endpoint, config.channel, page
    )
}

/// Fetch a single page image.
///
/// # Errors
/// Returns [`CaptureError::Fetch`] only for transport-level failures
/// (connection refused, DNS, timeout). A non-200 response is a normal
/// [`FetchOutcome::Failed`].
pub async fn fetch_page(
    client: &reqwest::Client,
    config: &CaptureConfig,
    page: u32,
) -> Result<FetchOutcome, CaptureError> {
    let url = page_url(config, page);
    debug!("GET {}", url);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| CaptureError::Fetch {
            page,
            reason: e.to_string(),
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        warn!("Failed to retrieve page {}: {}", page, status);
        return Ok(FetchOutcome::Failed(status));
    }

    let bytes = response.bytes().await.map_err(|e| CaptureError::Fetch {
        page,
        reason: e.to_string(),
    })?;

    debug!("Page {} → {} bytes", page, bytes.len());
    Ok(FetchOutcome::Ok(bytes.to_vec()))
}
