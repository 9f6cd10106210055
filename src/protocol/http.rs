// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for the device control-plane.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::ProtocolError;
use crate::protocol::{ApiResponse, Transport};

/// HTTP client for the Nanoleaf control-plane API.
///
/// A single transport is shared by every device handle; requests carry the
/// full per-device URL, so no per-device state lives here. HTTP is
/// stateless - each call is an independent request.
///
/// # Status Mapping
///
/// - `400 Bad Request` becomes [`ProtocolError::BadRequest`]. During
///   provisioning this is how a device signals that its link button has not
///   been pressed.
/// - `401 Unauthorized` becomes [`ProtocolError::AuthenticationFailed`].
/// - Any other non-success status becomes
///   [`ProtocolError::ConnectionFailed`].
///
/// # Examples
///
/// ```no_run
/// use nanor_lib::protocol::{HttpTransport, Transport};
///
/// # async fn example() -> nanor_lib::Result<()> {
/// let transport = HttpTransport::new()?;
/// let response = transport
///     .get("http://192.168.4.159:16021/api/v1/token123")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new transport with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, ProtocolError> {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    /// Creates a new transport with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ProtocolError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self { client })
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiResponse, ProtocolError> {
        let response = request.send().await.map_err(ProtocolError::Http)?;
        let status = response.status();

        if status == reqwest::StatusCode::BAD_REQUEST {
            return Err(ProtocolError::BadRequest);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProtocolError::AuthenticationFailed);
        }

        if !status.is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::debug!(status = status.as_u16(), body = %body, "Received device response");

        Ok(ApiResponse::new(body))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<ApiResponse, ProtocolError> {
        tracing::debug!(url = %url, "Sending GET request");
        self.execute(self.client.get(url)).await
    }

    async fn post(&self, url: &str) -> Result<ApiResponse, ProtocolError> {
        tracing::debug!(url = %url, "Sending POST request");
        self.execute(self.client.post(url)).await
    }

    async fn put(
        &self,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse, ProtocolError> {
        tracing::debug!(url = %url, body = ?body, "Sending PUT request");
        let mut request = self.client.put(url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        self.execute(request).await
    }

    async fn delete(&self, url: &str) -> Result<ApiResponse, ProtocolError> {
        tracing::debug!(url = %url, "Sending DELETE request");
        self.execute(self.client.delete(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_transport() {
        let transport = HttpTransport::new();
        assert!(transport.is_ok());
    }

    #[test]
    fn with_timeout_creates_transport() {
        let transport = HttpTransport::with_timeout(Duration::from_secs(2));
        assert!(transport.is_ok());
    }

    #[tokio::test]
    async fn request_to_unreachable_host_fails() {
        let transport = HttpTransport::with_timeout(Duration::from_millis(200)).unwrap();
        // Reserved TEST-NET-1 address, nothing listens there
        let result = transport.get("http://192.0.2.1:16021/api/v1/none").await;
        assert!(matches!(result, Err(ProtocolError::Http(_))));
    }
}
