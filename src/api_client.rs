use log::error;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;
use crate::filter::Filter;

pub const API_BASE_URL: &str = "https://api.openf1.org/v1";

/// Thin HTTP client for the OpenF1 REST API. One GET per call; no custom
/// headers, no retries, no caching. Failures are normalized into [`Error`]
/// and logged before they are returned.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self::with_base_url(API_BASE_URL)
    }

    /// Points the client at a different base address (mirrors, mock servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetches one resource as raw JSON. Unset filter fields are never
    /// serialized; present values, including zero, are sent in string form.
    pub async fn fetch_value(&self, resource: &str, filter: &impl Filter) -> Result<Value, Error> {
        let url = format!("{}/{}", self.base_url, resource);
        let response = self
            .client
            .get(&url)
            .query(&filter.pairs())
            .send()
            .await
            .map_err(|e| {
                error!("GET {url} failed: {e}");
                Error::from(e)
            })?;

        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(|e| {
                error!("GET {url} returned an undecodable body: {e}");
                Error::from(e)
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            let message = server_message(&body).unwrap_or_else(|| {
                format!(
                    "HTTP error {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )
            });
            error!("GET {url} failed with status {}: {message}", status.as_u16());
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Typed fetch over [`Self::fetch_value`].
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        resource: &str,
        filter: &impl Filter,
    ) -> Result<T, Error> {
        let value = self.fetch_value(resource, filter).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// The server-supplied `message` field of an error body, if the body is
/// valid JSON and carries one. Unparseable bodies are ignored silently.
fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_owned)
}
