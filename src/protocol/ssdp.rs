// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SSDP scan transport.
//!
//! This module implements discovery over SSDP: an `M-SEARCH` request is
//! multicast to the standard SSDP address, and unicast responses are parsed
//! into [`Advertisement`]s. Nanoleaf devices answer with the usual SSDP
//! headers plus `NL-DEVICEID` and `NL-DEVICENAME`.
//!
//! The search uses `ssdp:all`, so responses from unrelated devices are
//! expected; filtering by service type is the discovery layer's job.

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, watch};

use crate::error::ProtocolError;
use crate::protocol::{Advertisement, ScanTransport};
use crate::types::HardwareAddr;

/// Capacity of the advertisement stream handed to the caller.
const ADVERTISEMENT_CHANNEL_CAPACITY: usize = 32;

/// Receive buffer size; SSDP responses fit well within one datagram.
const RECV_BUFFER_SIZE: usize = 2048;

/// SSDP scanner for Nanoleaf devices.
///
/// Each [`start`](ScanTransport::start) call binds a fresh UDP socket,
/// multicasts one search request, and spawns a reader task that feeds the
/// returned stream until [`stop`](ScanTransport::stop) is called or the
/// receiver is dropped.
///
/// # Examples
///
/// ```no_run
/// use nanor_lib::protocol::{ScanTransport, SsdpScanner};
///
/// # async fn example() -> nanor_lib::Result<()> {
/// let scanner = SsdpScanner::new();
/// let mut advertisements = scanner.start().await?;
///
/// while let Some(advertisement) = advertisements.recv().await {
///     println!("{} at {}", advertisement.hardware_addr, advertisement.endpoint);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SsdpScanner {
    multicast_addr: String,
    search_target: String,
    mx: u8,
    shutdown: watch::Sender<bool>,
}

impl SsdpScanner {
    /// Standard SSDP multicast address and port.
    pub const DEFAULT_MULTICAST_ADDR: &'static str = "239.255.255.250:1900";

    /// Default search target matching every SSDP device.
    pub const DEFAULT_SEARCH_TARGET: &'static str = "ssdp:all";

    /// Default MX value (maximum response delay in seconds).
    pub const DEFAULT_MX: u8 = 3;

    /// Creates a scanner with the standard SSDP parameters.
    #[must_use]
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            multicast_addr: Self::DEFAULT_MULTICAST_ADDR.to_string(),
            search_target: Self::DEFAULT_SEARCH_TARGET.to_string(),
            mx: Self::DEFAULT_MX,
            shutdown,
        }
    }

    /// Overrides the search destination address.
    ///
    /// Mainly useful for tests, which point the scanner at a local
    /// responder instead of the multicast group.
    #[must_use]
    pub fn with_multicast_addr(mut self, addr: impl Into<String>) -> Self {
        self.multicast_addr = addr.into();
        self
    }

    /// Overrides the search target.
    #[must_use]
    pub fn with_search_target(mut self, search_target: impl Into<String>) -> Self {
        self.search_target = search_target.into();
        self
    }

    /// Overrides the MX value.
    #[must_use]
    pub fn with_mx(mut self, mx: u8) -> Self {
        self.mx = mx;
        self
    }

    fn search_message(&self) -> String {
        [
            "M-SEARCH * HTTP/1.1",
            &format!("HOST: {}", self.multicast_addr),
            "MAN: \"ssdp:discover\"",
            &format!("ST: {}", self.search_target),
            &format!("MX: {}", self.mx),
            "",
            "",
        ]
        .join("\r\n")
    }
}

impl Default for SsdpScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScanTransport for SsdpScanner {
    async fn start(&self) -> Result<mpsc::Receiver<Advertisement>, ProtocolError> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(ProtocolError::Io)?;

        let message = self.search_message();
        socket
            .send_to(message.as_bytes(), self.multicast_addr.as_str())
            .await
            .map_err(ProtocolError::Io)?;

        tracing::debug!(
            addr = %self.multicast_addr,
            search_target = %self.search_target,
            "Sent SSDP search"
        );

        // Reset the stop signal so a previous stop() does not end this scan
        self.shutdown.send_replace(false);
        let mut shutdown = self.shutdown.subscribe();

        let (tx, rx) = mpsc::channel(ADVERTISEMENT_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            let mut buf = [0u8; RECV_BUFFER_SIZE];
            loop {
                tokio::select! {
                    result = socket.recv_from(&mut buf) => {
                        match result {
                            Ok((len, peer)) => {
                                if let Some(advertisement) = parse_advertisement(&buf[..len]) {
                                    tracing::debug!(
                                        peer = %peer,
                                        hardware_addr = %advertisement.hardware_addr,
                                        "Received SSDP advertisement"
                                    );
                                    if tx.send(advertisement).await.is_err() {
                                        // Receiver dropped, scan is over
                                        break;
                                    }
                                }
                            }
                            Err(error) => {
                                tracing::warn!(error = %error, "SSDP receive failed");
                                break;
                            }
                        }
                    }
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn stop(&self) {
        let _ = self.shutdown.send(true);
    }
}

/// Parses one SSDP response datagram into an advertisement.
///
/// Returns `None` for datagrams that are not well-formed 200 responses or
/// that lack the required `ST`, `LOCATION`, or `NL-DEVICEID` headers. The
/// display name falls back to the hardware address when `NL-DEVICENAME` is
/// absent.
fn parse_advertisement(raw: &[u8]) -> Option<Advertisement> {
    let mut headers = [httparse::EMPTY_HEADER; 32];
    let mut response = httparse::Response::new(&mut headers);
    response.parse(raw).ok()?;

    if response.code != Some(200) {
        return None;
    }

    let service_type = header_value(response.headers, "ST")?.to_string();
    let endpoint = header_value(response.headers, "LOCATION")?.to_string();
    let hardware_addr = HardwareAddr::new(header_value(response.headers, "NL-DEVICEID")?);
    let display_name = header_value(response.headers, "NL-DEVICENAME")
        .map_or_else(|| hardware_addr.to_string(), ToString::to_string);

    Some(Advertisement {
        hardware_addr,
        display_name,
        endpoint,
        service_type,
    })
}

/// Finds a header by name (case-insensitive) and returns its trimmed value.
fn header_value<'b>(headers: &[httparse::Header<'b>], name: &str) -> Option<&'b str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .and_then(|h| std::str::from_utf8(h.value).ok())
        .map(str::trim)
}
