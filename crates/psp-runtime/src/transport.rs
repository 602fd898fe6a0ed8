//! # Outbound Transport
//!
//! Form-encoded POST transport for callback delivery and provider API
//! calls. Blocking from the caller's perspective: no retry, no backpressure.
//! Callers needing resilience add their own timeout/retry wrapper.

use psp_core::PspError;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

/// Outbound HTTP transport shared by the gateway
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
}

impl Transport {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// POST `data` form-encoded to `url` and return the raw response body.
    ///
    /// Any network failure or non-success HTTP status is a
    /// [`PspError::Transport`]; the response body of a failed request is
    /// carried in the error message for diagnostics.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        data: &T,
    ) -> Result<String, PspError> {
        debug!(url, "outbound form POST");

        let response = self
            .client
            .post(url)
            .form(data)
            .send()
            .await
            .map_err(|e| PspError::transport(format!("unable to reach '{url}': {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PspError::transport(format!("failed reading response from '{url}': {e}")))?;

        if !status.is_success() {
            error!(url, status = status.as_u16(), "outbound POST failed");
            return Err(PspError::transport(format!(
                "request to '{url}' failed with HTTP {status}: {body}"
            )));
        }

        Ok(body)
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}
