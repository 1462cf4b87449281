//! HTTP client for the sensor history document.
//!
//! ```text
//! GET <base_url>/data.json?range=30m&interval=15s
//! ```
//!
//! A `2xx` body is decoded as [`DataResponse`].  Any other status carries the
//! server's `{"code": ..., "message": ...}` error body, which is surfaced as
//! [`FetchError::Status`].

use home_core::DataResponse;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::DashboardConfig;

/// Error type for [`DataClient`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid data document: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Error body sent with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Fetches `/data.json` for one [`DashboardConfig`].
pub struct DataClient {
    client: Client,
    config: DashboardConfig,
}

impl DataClient {
    /// Creates a client whose requests time out after `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend cannot be initialised.
    pub fn new(config: DashboardConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Performs the request and decodes the response.
    ///
    /// A `200` carrying `{"error": ...}` is returned as `Ok`; deciding what
    /// to do with it is up to the caller.
    pub async fn fetch(&self) -> Result<DataResponse, FetchError> {
        let url = self.config.data_url();
        let request_err = |source| FetchError::Request {
            url: url.clone(),
            source,
        };

        debug!(
            "GET {url} range={} interval={}",
            self.config.range, self.config.interval
        );
        let response = self
            .client
            .get(&url)
            .query(&[
                ("range", self.config.range.as_str()),
                ("interval", self.config.interval.as_str()),
            ])
            .send()
            .await
            .map_err(request_err)?;

        let status = response.status();
        let body = response.text().await.map_err(request_err)?;
        debug!("{url} answered {status} ({} bytes)", body.len());

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_default();
            let message = if message.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                message
            };
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
