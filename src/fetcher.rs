//! Retrieves post pages over HTTP.

use reqwest::Client;
use tracing::{debug, error, instrument};

use crate::config::Config;
use crate::error::{AssistantError, Result};

#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AssistantError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// `GET` the page and return its body. Transport failures and non-2xx
    /// statuses are errors; an error page is never handed back as content.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let fetch_error = |reason: String| AssistantError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self.client.get(url).send().await.map_err(|e| {
            error!(error = %e, "Page request failed");
            if e.is_timeout() {
                fetch_error("request timed out".to_string())
            } else {
                fetch_error(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "Page request returned an error status");
            return Err(fetch_error(format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_error(format!("failed to read body: {e}")))?;

        debug!(bytes = body.len(), "Fetched page");
        Ok(body.to_vec())
    }
}
