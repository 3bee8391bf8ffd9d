//! HTTP access for meta-tag discovery.

use std::time::Duration;

use licrawl_util::errors::LicrawlError;
use reqwest::Client;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a shared reqwest client for page fetches.
pub fn build_client() -> miette::Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent("licrawl/0.1")
        .build()
        .map_err(|e| {
            LicrawlError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            }
            .into()
        })
}

/// Fetch a page body as text. Non-success statuses are errors.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, LicrawlError> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| LicrawlError::Network {
            message: format!("Cant open link {url}: {e}"),
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(LicrawlError::Network {
            message: format!("HTTP {status} fetching {url}"),
        });
    }

    resp.text().await.map_err(|e| LicrawlError::Network {
        message: format!("Failed to read response from {url}: {e}"),
    })
}
