//! Upstream HTTP client shared by every remote content source.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

const USER_AGENT_VALUE: &str = concat!("tabspire-backend/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper over `reqwest::Client` that turns non-2xx answers into errors.
///
/// Every request is bounded by the configured upstream timeout, so a stalled
/// source fails and the chain moves on.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// GET `url` and decode a JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let response = self.send(url, headers).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| AppError::Malformed(format!("Unexpected JSON from {}: {}", url, e)))
    }

    /// GET `url` and return the body as text.
    pub async fn get_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, AppError> {
        let response = self.send(url, headers).await?;
        Ok(response.text().await?)
    }

    async fn send(&self, url: &str, headers: &[(&str, &str)]) -> Result<reqwest::Response, AppError> {
        tracing::debug!("GET {}", url);

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

/// Accept header for feed requests.
pub const XML_ACCEPT: (&str, &str) = ("accept", "application/xml, text/xml, */*");

/// Header name the scripture API reads its key from.
pub const API_KEY_HEADER: &str = "api-key";
