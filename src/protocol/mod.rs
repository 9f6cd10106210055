// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol implementations for reaching Nanoleaf devices.
//!
//! This module provides the two transports the library is built on:
//!
//! - [`HttpTransport`]: the control-plane client for a device's REST API
//! - [`SsdpScanner`]: the discovery client listening for SSDP advertisements
//!
//! Both are used through traits ([`Transport`], [`ScanTransport`]) so tests
//! and embedders can substitute their own implementations.

mod http;
mod ssdp;

pub use http::HttpTransport;
pub use ssdp::SsdpScanner;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::ProtocolError;
use crate::types::HardwareAddr;

/// Response from a device API call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// The raw response body.
    body: String,
}

impl ApiResponse {
    /// Creates a new response with the given body.
    #[must_use]
    pub fn new(body: String) -> Self {
        Self { body }
    }

    /// Returns the raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns `true` if the device sent no body.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Parses the response as a specific type.
    ///
    /// # Errors
    ///
    /// Returns error if the body cannot be parsed into the target type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, crate::error::ParseError> {
        serde_json::from_str(&self.body).map_err(Into::into)
    }
}

/// An SSDP-style advertisement announcing a device on the network.
///
/// Produced by a [`ScanTransport`] from the headers of a discovery
/// response: `NL-DEVICEID`, `NL-DEVICENAME`, `LOCATION`, and `ST`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    /// Hardware address from the `NL-DEVICEID` header.
    pub hardware_addr: HardwareAddr,
    /// Display name from the `NL-DEVICENAME` header, falling back to the
    /// hardware address when the header is absent.
    pub display_name: String,
    /// Base URL of the device's control API, from the `LOCATION` header.
    pub endpoint: String,
    /// Advertised service type, from the `ST` header.
    pub service_type: String,
}

/// Trait for transports that execute device control-plane requests.
///
/// Nanoleaf's API uses each verb in a fixed shape: `GET` reads state,
/// `POST` creates an authorization (never with a body), `PUT` writes state
/// or triggers actions (optionally with a body), and `DELETE` revokes an
/// authorization. The trait mirrors that shape rather than generic HTTP.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends a GET request to the given URL.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails or the device responds
    /// with a non-success status.
    async fn get(&self, url: &str) -> Result<ApiResponse, ProtocolError>;

    /// Sends a bodyless POST request to the given URL.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails or the device responds
    /// with a non-success status.
    async fn post(&self, url: &str) -> Result<ApiResponse, ProtocolError>;

    /// Sends a PUT request with an optional JSON body to the given URL.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails or the device responds
    /// with a non-success status.
    async fn put(
        &self,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse, ProtocolError>;

    /// Sends a DELETE request to the given URL.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails or the device responds
    /// with a non-success status.
    async fn delete(&self, url: &str) -> Result<ApiResponse, ProtocolError>;
}

/// Trait for transports that listen for device advertisements.
#[async_trait]
pub trait ScanTransport: Send + Sync + 'static {
    /// Starts a scan and returns the stream of received advertisements.
    ///
    /// The stream stays open until [`stop`](Self::stop) is called or the
    /// receiver is dropped.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the underlying listener cannot be set up.
    async fn start(&self) -> Result<mpsc::Receiver<Advertisement>, ProtocolError>;

    /// Stops the scan; the advertisement stream ends shortly after.
    async fn stop(&self);
}
