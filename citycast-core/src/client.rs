//! HTTP access to the weather API.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{config::ApiConfig, error::FetchError, request::RequestDescriptor};

/// Issues exactly one request per call and returns the decoded JSON body.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<Value, FetchError>;
}

/// [`WeatherClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpWeatherClient {
    base_url: String,
    http: Client,
}

impl HttpWeatherClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(FetchError::Transport)?;

        Ok(Self::with_client(config.base_url.clone(), http))
    }

    pub fn with_client(base_url: String, http: Client) -> Self {
        Self { base_url, http }
    }
}

#[async_trait]
impl WeatherClient for HttpWeatherClient {
    #[instrument(skip(self, request), fields(endpoint = %request.endpoint()))]
    async fn fetch(&self, request: &RequestDescriptor) -> Result<Value, FetchError> {
        let url = request.url(&self.base_url)?;
        debug!(path = url.path(), "Sending request");

        let res = self.http.get(url).send().await.map_err(FetchError::Transport)?;

        let status = res.status();
        if !status.is_success() {
            // The status is the error; an unreadable body must not replace it.
            let body = res.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body: truncate_body(&body) });
        }

        let body = res
            .text()
            .await
            .map_err(|e| FetchError::Body(format!("Failed to read response body: {e}")))?;

        debug!(%status, bytes = body.len(), "Received response");

        serde_json::from_str(&body).map_err(|e| FetchError::Body(e.to_string()))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept() {
        assert_eq!(truncate_body("{\"cod\":\"404\"}"), "{\"cod\":\"404\"}");
    }

    #[test]
    fn long_bodies_are_cut_on_char_boundary() {
        let body = "é".repeat(300);
        let cut = truncate_body(&body);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }

    #[test]
    fn client_builds_with_timeout() {
        let mut config = ApiConfig::new("KEY");
        config.timeout_secs = Some(5);
        assert!(HttpWeatherClient::new(&config).is_ok());
    }
}
