use reqwest::{Client, Url};

use crate::error::{Context, Result};

/// Thin GET-only wrapper around a shared HTTP client.
///
/// Status codes are not interpreted and nothing is retried; the caller decides what a
/// body means. Timeouts are whatever the transport defaults to.
#[derive(Debug, Clone, Default)]
pub struct RemoteFetcher {
    client: Client,
}

impl RemoteFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Issue one GET request and return the complete body as text.
    pub async fn get_text(&self, url: Url) -> Result<String> {
        let host = url.host_str().unwrap_or_default().to_string();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {host} failed"))?;

        log::debug!("{} responded with status {}", host, response.status());

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {host}"))?;
        Ok(body)
    }
}
