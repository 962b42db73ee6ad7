use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use super::mapping::map_payload;
use super::SeedSource;
use crate::config::SeedConfig;
use crate::error::{Error, Result};
use crate::record::Employee;

/// Seed source backed by a faker-style HTTP API.
///
/// Issues `GET <endpoint>?_quantity=<count>` and maps the `data` array of
/// the response. The client carries a total request timeout so a stuck
/// endpoint cannot hold up bootstrap.
#[derive(Debug, Clone)]
pub struct FakerSeedSource {
    endpoint: String,
    client: Client,
}

impl FakerSeedSource {
    /// Default person generator endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://fakerapi.it/api/v1/persons";

    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a source for `endpoint` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::seed_request(&endpoint, format!("failed to build client: {e}")))?;
        Ok(Self { endpoint, client })
    }

    /// Create a source from the seed section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &SeedConfig) -> Result<Self> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_millis(config.timeout_ms),
        )
    }

    /// The endpoint this source queries.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_error(&self, e: &reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                operation: format!("seed fetch from {}", self.endpoint),
            }
        } else {
            let kind = if e.is_connect() {
                "connect"
            } else if e.is_decode() {
                "decode"
            } else if e.is_request() {
                "request"
            } else {
                "unknown"
            };
            Error::seed_request(&self.endpoint, format!("{kind} error: {e}"))
        }
    }
}

#[async_trait]
impl SeedSource for FakerSeedSource {
    fn name(&self) -> &'static str {
        "faker"
    }

    async fn try_fetch_seed(&self, count: usize) -> Result<Vec<Employee>> {
        debug!(endpoint = %self.endpoint, count, "Requesting seed data");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("_quantity", count)])
            .send()
            .await
            .map_err(|e| self.request_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::SeedStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| self.request_error(&e))?;

        let records = map_payload(&payload);
        info!(endpoint = %self.endpoint, requested = count, received = records.len(), "Fetched seed data");
        Ok(records)
    }
}
