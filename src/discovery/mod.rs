// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SSDP auto-discovery for Nanoleaf devices.
//!
//! This module provides a background discovery loop that finds Nanoleaf
//! controllers on the local network and keeps a registry of ready-to-use
//! [`Device`] handles.
//!
//! # Discovery Mechanism
//!
//! Each scan cycle multicasts one SSDP search and listens for responses
//! until the cycle's window elapses:
//!
//! - While the registry is empty, cycles repeat every 6 seconds so the
//!   first device is found quickly.
//! - Once a device is known, cycles slow down to every 5 minutes.
//!
//! Responses whose service type does not mention `nanoleaf` are ignored,
//! and repeat sightings of one device within a 5 second window are
//! throttled. A newly registered device immediately requests an auth
//! token; that succeeds only while the controller is in pairing mode, so
//! rejections are logged and the device stays registered for later use.
//!
//! # Examples
//!
//! ```no_run
//! use nanor_lib::Discovery;
//!
//! # async fn example() -> nanor_lib::Result<()> {
//! let discovery = Discovery::ssdp()?;
//! let mut events = discovery.subscribe();
//!
//! discovery.start();
//!
//! while let Ok(event) = events.recv().await {
//!     println!("discovery event: {event:?}");
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{RwLock, broadcast, watch};
use tokio::time::Instant;

use crate::device::Device;
use crate::error::Error;
use crate::event::{DeviceEvent, EventBus};
use crate::protocol::{Advertisement, HttpTransport, ScanTransport, SsdpScanner, Transport};
use crate::types::HardwareAddr;

mod throttle;

use throttle::ExpiringSet;

/// Substring identifying Nanoleaf SSDP service types.
const SERVICE_TYPE_FILTER: &str = "nanoleaf";

/// Background discovery loop and device registry.
///
/// `Discovery` is generic over its scan transport and its device transport
/// so both can be replaced in tests; [`Discovery::ssdp`] wires up the real
/// SSDP scanner and HTTP client.
///
/// Cloning is cheap and clones share the registry, the event bus, and the
/// running loop.
#[derive(Debug)]
pub struct Discovery<S: ScanTransport, T: Transport> {
    scanner: Arc<S>,
    transport: Arc<T>,
    devices: Arc<RwLock<HashMap<HardwareAddr, Device<T>>>>,
    throttle: Arc<Mutex<ExpiringSet<HardwareAddr>>>,
    event_bus: EventBus,
    running: Arc<AtomicBool>,
    shutdown: watch::Sender<bool>,
    empty_interval: Duration,
    steady_interval: Duration,
}

impl<S: ScanTransport, T: Transport> Discovery<S, T> {
    /// Scan interval while no device is known.
    pub const DEFAULT_EMPTY_SCAN_INTERVAL: Duration = Duration::from_secs(6);

    /// Scan interval once at least one device is known.
    pub const DEFAULT_STEADY_SCAN_INTERVAL: Duration = Duration::from_secs(300);

    /// Window during which repeat sightings of one device are ignored.
    pub const DEFAULT_THROTTLE_WINDOW: Duration = Duration::from_millis(5000);

    /// Creates a discovery manager from its transports.
    #[must_use]
    pub fn new(scanner: S, transport: T) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            scanner: Arc::new(scanner),
            transport: Arc::new(transport),
            devices: Arc::new(RwLock::new(HashMap::new())),
            throttle: Arc::new(Mutex::new(ExpiringSet::new(Self::DEFAULT_THROTTLE_WINDOW))),
            event_bus: EventBus::new(),
            running: Arc::new(AtomicBool::new(false)),
            shutdown,
            empty_interval: Self::DEFAULT_EMPTY_SCAN_INTERVAL,
            steady_interval: Self::DEFAULT_STEADY_SCAN_INTERVAL,
        }
    }

    /// Overrides the scan intervals.
    ///
    /// `empty` is used while the registry is empty, `steady` once at least
    /// one device is known.
    #[must_use]
    pub fn with_scan_intervals(mut self, empty: Duration, steady: Duration) -> Self {
        self.empty_interval = empty;
        self.steady_interval = steady;
        self
    }

    /// Overrides the sighting throttle window.
    #[must_use]
    pub fn with_throttle_window(mut self, window: Duration) -> Self {
        self.throttle = Arc::new(Mutex::new(ExpiringSet::new(window)));
        self
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Starts the background discovery loop.
    ///
    /// Does nothing if the loop is already running. The loop keeps scanning
    /// until [`stop`](Self::stop) is called.
    pub fn start(&self) {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        self.shutdown.send_replace(false);
        tracing::info!("Starting device discovery");

        let discovery = self.clone();
        tokio::spawn(async move {
            discovery.run().await;
            discovery.running.store(false, Ordering::SeqCst);
            tracing::info!("Device discovery stopped");
        });
    }

    /// Stops the background discovery loop.
    ///
    /// Registered devices stay in the registry and remain usable.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Returns `true` while the discovery loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Returns handles to all registered devices.
    pub async fn devices(&self) -> Vec<Device<T>> {
        self.devices.read().await.values().cloned().collect()
    }

    /// Returns a handle to one device, if registered.
    pub async fn device(&self, hardware_addr: &HardwareAddr) -> Option<Device<T>> {
        self.devices.read().await.get(hardware_addr).cloned()
    }

    /// Returns the hardware addresses of all registered devices.
    pub async fn hardware_addrs(&self) -> Vec<HardwareAddr> {
        self.devices.read().await.keys().cloned().collect()
    }

    /// Returns the number of registered devices.
    pub async fn device_count(&self) -> usize {
        self.devices.read().await.len()
    }

    /// Removes a device from the registry.
    ///
    /// Returns `true` if the device was registered. An empty registry makes
    /// the loop fall back to the fast scan interval, so a removed device
    /// that is still on the network is usually re-registered by the next
    /// scan.
    pub async fn remove_device(&self, hardware_addr: &HardwareAddr) -> bool {
        let removed = self.devices.write().await.remove(hardware_addr).is_some();
        if removed {
            tracing::debug!(hardware_addr = %hardware_addr, "Device removed from registry");
        }
        removed
    }

    /// Subscribes to discovery and authorization events.
    ///
    /// Subscribe before calling [`start`](Self::start) to observe every
    /// device from the first scan on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.event_bus.subscribe()
    }

    /// Returns the number of active event subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.event_bus.subscriber_count()
    }

    // =========================================================================
    // Scan loop
    // =========================================================================

    async fn run(&self) {
        let mut shutdown = self.shutdown.subscribe();
        if *shutdown.borrow() {
            return;
        }

        loop {
            let window = if self.devices.read().await.is_empty() {
                self.empty_interval
            } else {
                self.steady_interval
            };

            tracing::debug!(window = ?window, "Starting scan cycle");

            let deadline = Instant::now() + window;
            if !self.scan_cycle(deadline, &mut shutdown).await {
                break;
            }
        }
    }

    /// Runs one scan cycle until `deadline`.
    ///
    /// Returns `false` when shutdown was requested.
    async fn scan_cycle(&self, deadline: Instant, shutdown: &mut watch::Receiver<bool>) -> bool {
        let mut advertisements = match self.scanner.start().await {
            Ok(advertisements) => advertisements,
            Err(error) => {
                tracing::warn!(error = %error, "Scan failed to start, retrying next cycle");
                return hold_until(deadline, shutdown).await;
            }
        };

        let mut stream_open = true;
        let keep_running = loop {
            tokio::select! {
                () = tokio::time::sleep_until(deadline) => break true,
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break false;
                    }
                }
                advertisement = advertisements.recv(), if stream_open => {
                    match advertisement {
                        Some(advertisement) => {
                            let processed = self.handle_advertisement(advertisement);
                            if !race_shutdown(processed, shutdown).await {
                                break false;
                            }
                        }
                        None => stream_open = false,
                    }
                }
            }
        };

        self.scanner.stop().await;
        keep_running
    }

    async fn handle_advertisement(&self, advertisement: Advertisement) {
        if !advertisement
            .service_type
            .to_ascii_lowercase()
            .contains(SERVICE_TYPE_FILTER)
        {
            return;
        }

        let fresh = self
            .throttle
            .lock()
            .try_insert(advertisement.hardware_addr.clone(), Instant::now());
        if !fresh {
            return;
        }

        let existing = self
            .devices
            .read()
            .await
            .get(&advertisement.hardware_addr)
            .cloned();

        match existing {
            Some(device) => self.refresh_device(&device, &advertisement),
            None => self.register_device(advertisement).await,
        }
    }

    /// Updates a known device from a fresh advertisement.
    ///
    /// Publishes [`DeviceEvent::ChangedDevice`] once if the endpoint or the
    /// display name differs from what is registered.
    fn refresh_device(&self, device: &Device<T>, advertisement: &Advertisement) {
        let endpoint_changed = device.endpoint() != advertisement.endpoint;
        let name_changed = device.name() != advertisement.display_name;
        if !endpoint_changed && !name_changed {
            return;
        }

        if endpoint_changed {
            device.set_endpoint(advertisement.endpoint.clone());
        }
        if name_changed {
            device.set_display_name(advertisement.display_name.clone());
        }

        tracing::debug!(
            hardware_addr = %advertisement.hardware_addr,
            name = %advertisement.display_name,
            endpoint = %advertisement.endpoint,
            "Device advertisement changed"
        );

        self.event_bus.publish(DeviceEvent::changed_device(
            advertisement.hardware_addr.clone(),
            advertisement.display_name.clone(),
            advertisement.endpoint.clone(),
        ));
    }

    async fn register_device(&self, advertisement: Advertisement) {
        let device = Device::with_event_bus(
            Arc::clone(&self.transport),
            advertisement.hardware_addr.clone(),
            advertisement.display_name.clone(),
            advertisement.endpoint.clone(),
            self.event_bus.clone(),
        );

        self.devices
            .write()
            .await
            .insert(advertisement.hardware_addr.clone(), device.clone());

        tracing::info!(
            hardware_addr = %advertisement.hardware_addr,
            name = %advertisement.display_name,
            endpoint = %advertisement.endpoint,
            "Discovered new device"
        );

        self.event_bus.publish(DeviceEvent::new_device(
            advertisement.hardware_addr,
            advertisement.display_name,
            advertisement.endpoint,
        ));

        // Worth trying right away in case pairing mode is active; outside
        // of it the request is rejected and the device stays unauthorized.
        if let Err(error) = device.create_user().await {
            tracing::debug!(
                hardware_addr = %device.hardware_addr(),
                error = %error,
                "Initial authorization failed"
            );
        }
    }
}

impl Discovery<SsdpScanner, HttpTransport> {
    /// Creates a discovery manager with the standard SSDP scanner and HTTP
    /// transport.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn ssdp() -> Result<Self, Error> {
        Ok(Self::new(SsdpScanner::new(), HttpTransport::new()?))
    }
}

impl<S: ScanTransport, T: Transport> Clone for Discovery<S, T> {
    fn clone(&self) -> Self {
        Self {
            scanner: Arc::clone(&self.scanner),
            transport: Arc::clone(&self.transport),
            devices: Arc::clone(&self.devices),
            throttle: Arc::clone(&self.throttle),
            event_bus: self.event_bus.clone(),
            running: Arc::clone(&self.running),
            shutdown: self.shutdown.clone(),
            empty_interval: self.empty_interval,
            steady_interval: self.steady_interval,
        }
    }
}

/// Waits until `deadline`; returns `false` if shutdown is requested first.
async fn hold_until(deadline: Instant, shutdown: &mut watch::Receiver<bool>) -> bool {
    loop {
        tokio::select! {
            () = tokio::time::sleep_until(deadline) => break true,
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break false;
                }
            }
        }
    }
}

/// Drives `task` to completion; returns `false` if shutdown preempts it.
///
/// On shutdown the task is dropped where it stands, cancelling any
/// request it has in flight.
async fn race_shutdown<F>(task: F, shutdown: &mut watch::Receiver<bool>) -> bool
where
    F: Future<Output = ()>,
{
    tokio::pin!(task);
    loop {
        tokio::select! {
            () = &mut task => break true,
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use super::*;
    use crate::error::ProtocolError;
    use crate::protocol::ApiResponse;

    #[derive(Debug)]
    struct TokenTransport;

    #[async_trait]
    impl Transport for TokenTransport {
        async fn get(&self, _url: &str) -> Result<ApiResponse, ProtocolError> {
            Ok(ApiResponse::new("{}".to_string()))
        }

        async fn post(&self, _url: &str) -> Result<ApiResponse, ProtocolError> {
            Ok(ApiResponse::new(r#"{"auth_token":"abc123"}"#.to_string()))
        }

        async fn put(
            &self,
            _url: &str,
            _body: Option<serde_json::Value>,
        ) -> Result<ApiResponse, ProtocolError> {
            Ok(ApiResponse::new(String::new()))
        }

        async fn delete(&self, _url: &str) -> Result<ApiResponse, ProtocolError> {
            Ok(ApiResponse::new(String::new()))
        }
    }

    #[derive(Debug)]
    struct IdleScanner;

    #[async_trait]
    impl ScanTransport for IdleScanner {
        async fn start(&self) -> Result<mpsc::Receiver<Advertisement>, ProtocolError> {
            let (_tx, rx) = mpsc::channel(1);
            Ok(rx)
        }

        async fn stop(&self) {}
    }

    fn advertisement() -> Advertisement {
        Advertisement {
            hardware_addr: HardwareAddr::new("13:F6:11:72:E2:38"),
            display_name: "Bedroom Panels".to_string(),
            endpoint: "http://192.168.4.159:16021".to_string(),
            service_type: "nanoleaf_aurora:light".to_string(),
        }
    }

    #[tokio::test]
    async fn new_discovery_is_stopped_and_empty() {
        let discovery = Discovery::new(IdleScanner, TokenTransport);

        assert!(!discovery.is_running());
        assert_eq!(discovery.device_count().await, 0);
        assert!(discovery.devices().await.is_empty());
    }

    #[test]
    fn builders_override_defaults() {
        let discovery = Discovery::new(IdleScanner, TokenTransport)
            .with_scan_intervals(Duration::from_secs(1), Duration::from_secs(60))
            .with_throttle_window(Duration::from_millis(100));

        assert_eq!(discovery.empty_interval, Duration::from_secs(1));
        assert_eq!(discovery.steady_interval, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn advertisement_registers_device() {
        let discovery = Discovery::new(IdleScanner, TokenTransport);
        let mut events = discovery.subscribe();

        discovery.handle_advertisement(advertisement()).await;

        assert_eq!(discovery.device_count().await, 1);
        let device = discovery
            .device(&HardwareAddr::new("13:F6:11:72:E2:38"))
            .await
            .unwrap();
        assert_eq!(device.name(), "Bedroom Panels");
        assert_eq!(device.endpoint(), "http://192.168.4.159:16021");
        // TokenTransport hands out a token, so registration authorizes
        assert!(device.is_authorized());

        let event = events.recv().await.unwrap();
        assert!(matches!(event, DeviceEvent::NewDevice { .. }));
    }

    #[tokio::test]
    async fn foreign_service_types_are_ignored() {
        let discovery = Discovery::new(IdleScanner, TokenTransport);

        let mut foreign = advertisement();
        foreign.service_type = "urn:schemas-upnp-org:device:MediaRenderer:1".to_string();
        discovery.handle_advertisement(foreign).await;

        assert_eq!(discovery.device_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_sightings_is_throttled() {
        let discovery = Discovery::new(IdleScanner, TokenTransport);

        discovery.handle_advertisement(advertisement()).await;

        // Same device advertising a new endpoint inside the window
        let mut changed = advertisement();
        changed.endpoint = "http://192.168.4.201:16021".to_string();
        discovery.handle_advertisement(changed).await;

        let device = discovery
            .device(&HardwareAddr::new("13:F6:11:72:E2:38"))
            .await
            .unwrap();
        assert_eq!(device.endpoint(), "http://192.168.4.159:16021");
    }

    #[tokio::test(start_paused = true)]
    async fn endpoint_change_after_window_publishes_changed_device() {
        let discovery = Discovery::new(IdleScanner, TokenTransport);
        let mut events = discovery.subscribe();

        discovery.handle_advertisement(advertisement()).await;
        tokio::time::advance(Duration::from_secs(5)).await;

        let mut changed = advertisement();
        changed.endpoint = "http://192.168.4.201:16021".to_string();
        discovery.handle_advertisement(changed).await;

        assert_eq!(discovery.device_count().await, 1);
        let device = discovery
            .device(&HardwareAddr::new("13:F6:11:72:E2:38"))
            .await
            .unwrap();
        assert_eq!(device.endpoint(), "http://192.168.4.201:16021");

        // Registration events come first, then the change
        loop {
            let event = events.recv().await.unwrap();
            if let DeviceEvent::ChangedDevice { endpoint, .. } = event {
                assert_eq!(endpoint, "http://192.168.4.201:16021");
                break;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_advertisement_publishes_nothing() {
        let discovery = Discovery::new(IdleScanner, TokenTransport);

        discovery.handle_advertisement(advertisement()).await;
        tokio::time::advance(Duration::from_secs(5)).await;

        let mut events = discovery.subscribe();
        discovery.handle_advertisement(advertisement()).await;

        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn remove_device_clears_registry() {
        let discovery = Discovery::new(IdleScanner, TokenTransport);
        discovery.handle_advertisement(advertisement()).await;

        let addr = HardwareAddr::new("13:F6:11:72:E2:38");
        assert!(discovery.remove_device(&addr).await);
        assert!(!discovery.remove_device(&addr).await);
        assert_eq!(discovery.device_count().await, 0);
    }
}
