// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the discovery loop using a scripted scanner.
//!
//! The scanner replays a prepared batch of advertisements per scan cycle,
//! while device traffic still goes through the real HTTP transport against
//! wiremock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use nanor_lib::protocol::{Advertisement, HttpTransport, ScanTransport};
use nanor_lib::{AuthState, DeviceEvent, Discovery, HardwareAddr, ProtocolError};
use tokio::sync::mpsc;
use tokio::time::timeout;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Scan transport replaying one prepared advertisement batch per cycle.
#[derive(Debug, Clone)]
struct ScriptedScanner {
    inner: Arc<ScannerInner>,
}

#[derive(Debug)]
struct ScannerInner {
    batches: Mutex<VecDeque<Vec<Advertisement>>>,
    starts: AtomicUsize,
}

impl ScriptedScanner {
    fn new(batches: Vec<Vec<Advertisement>>) -> Self {
        Self {
            inner: Arc::new(ScannerInner {
                batches: Mutex::new(batches.into()),
                starts: AtomicUsize::new(0),
            }),
        }
    }

    fn start_count(&self) -> usize {
        self.inner.starts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScanTransport for ScriptedScanner {
    async fn start(&self) -> Result<mpsc::Receiver<Advertisement>, ProtocolError> {
        self.inner.starts.fetch_add(1, Ordering::SeqCst);
        let batch = self
            .inner
            .batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();

        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(async move {
            for advertisement in batch {
                if tx.send(advertisement).await.is_err() {
                    break;
                }
            }
        });
        Ok(rx)
    }

    async fn stop(&self) {}
}

fn advertisement(mock_server: &MockServer) -> Advertisement {
    Advertisement {
        hardware_addr: HardwareAddr::new("13:F6:11:72:E2:38"),
        display_name: "Bedroom Panels".to_string(),
        endpoint: mock_server.uri(),
        service_type: "nanoleaf_aurora:light".to_string(),
    }
}

/// Mounts `POST /api/v1/new` handing out a token.
async fn mount_token_endpoint(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "auth_token": "abc123"
        })))
        .mount(mock_server)
        .await;
}

/// Mounts `POST /api/v1/new` rejecting every request.
async fn mount_rejecting_token_endpoint(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/new"))
        .respond_with(ResponseTemplate::new(401))
        .mount(mock_server)
        .await;
}

/// Polls until the registry holds `expected` devices or the timeout passes.
async fn wait_for_device_count(
    discovery: &Discovery<ScriptedScanner, HttpTransport>,
    expected: usize,
) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while discovery.device_count().await != expected {
        assert!(
            tokio::time::Instant::now() < deadline,
            "registry did not reach {expected} devices in time"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn discovery_registers_advertised_device() {
    let mock_server = MockServer::start().await;
    mount_token_endpoint(&mock_server).await;

    let scanner = ScriptedScanner::new(vec![vec![advertisement(&mock_server)]]);
    let discovery = Discovery::new(scanner, HttpTransport::new().unwrap())
        .with_scan_intervals(Duration::from_millis(50), Duration::from_secs(10));
    let mut events = discovery.subscribe();

    discovery.start();
    assert!(discovery.is_running());

    let event = timeout(Duration::from_secs(2), events.recv())
        .await
        .unwrap()
        .unwrap();
    match event {
        DeviceEvent::NewDevice {
            hardware_addr,
            name,
            endpoint,
        } => {
            assert_eq!(hardware_addr.as_str(), "13:F6:11:72:E2:38");
            assert_eq!(name, "Bedroom Panels");
            assert_eq!(endpoint, mock_server.uri());
        }
        other => panic!("expected NewDevice, got {other:?}"),
    }

    // Registration provisions a token right away
    let event = timeout(Duration::from_secs(2), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(event, DeviceEvent::AuthTokenGenerated { .. }));

    let addr = HardwareAddr::new("13:F6:11:72:E2:38");
    assert_eq!(discovery.hardware_addrs().await, vec![addr.clone()]);
    let device = discovery.device(&addr).await.unwrap();
    assert_eq!(device.auth_token().as_deref(), Some("abc123"));
    assert_eq!(device.name(), "Bedroom Panels");

    discovery.stop();
}

#[tokio::test]
async fn advertisement_burst_registers_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "auth_token": "abc123"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let burst = vec![
        advertisement(&mock_server),
        advertisement(&mock_server),
        advertisement(&mock_server),
    ];
    let scanner = ScriptedScanner::new(vec![burst]);
    let discovery = Discovery::new(scanner, HttpTransport::new().unwrap())
        .with_scan_intervals(Duration::from_millis(50), Duration::from_secs(10));

    discovery.start();
    wait_for_device_count(&discovery, 1).await;

    // Let the rest of the burst drain through the throttle
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(discovery.device_count().await, 1);

    discovery.stop();
}

#[tokio::test]
async fn changed_endpoint_publishes_changed_device() {
    let mock_server = MockServer::start().await;
    mount_rejecting_token_endpoint(&mock_server).await;

    let first = advertisement(&mock_server);
    let mut moved = advertisement(&mock_server);
    moved.endpoint = "http://192.0.2.99:16021".to_string();

    let scanner = ScriptedScanner::new(vec![vec![first], vec![moved]]);
    let discovery = Discovery::new(scanner, HttpTransport::new().unwrap())
        .with_scan_intervals(Duration::from_millis(50), Duration::from_millis(50))
        .with_throttle_window(Duration::from_millis(10));
    let mut events = discovery.subscribe();

    discovery.start();

    let endpoint = timeout(Duration::from_secs(3), async {
        loop {
            if let DeviceEvent::ChangedDevice { endpoint, .. } = events.recv().await.unwrap() {
                break endpoint;
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(endpoint, "http://192.0.2.99:16021");

    let device = discovery
        .device(&HardwareAddr::new("13:F6:11:72:E2:38"))
        .await
        .unwrap();
    assert_eq!(device.endpoint(), "http://192.0.2.99:16021");
    assert_eq!(discovery.device_count().await, 1);

    discovery.stop();
}

#[tokio::test]
async fn scan_cadence_slows_after_first_device() {
    let mock_server = MockServer::start().await;
    mount_rejecting_token_endpoint(&mock_server).await;

    // First two cycles come up empty, the third finds the device
    let scanner = ScriptedScanner::new(vec![vec![], vec![], vec![advertisement(&mock_server)]]);
    let discovery = Discovery::new(scanner.clone(), HttpTransport::new().unwrap())
        .with_scan_intervals(Duration::from_millis(30), Duration::from_secs(10));

    discovery.start();
    wait_for_device_count(&discovery, 1).await;

    // The empty-registry cadence ran several cycles before the hit, and the
    // first steady cycle starts straight after it
    tokio::time::sleep(Duration::from_millis(300)).await;
    let starts_after_registration = scanner.start_count();
    assert!(starts_after_registration >= 3);

    // Steady cadence: no further scan starts within this stretch
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(scanner.start_count(), starts_after_registration);

    discovery.stop();
}

#[tokio::test]
async fn stop_halts_the_loop() {
    let scanner = ScriptedScanner::new(Vec::new());
    let discovery = Discovery::new(scanner.clone(), HttpTransport::new().unwrap())
        .with_scan_intervals(Duration::from_millis(30), Duration::from_millis(30));

    discovery.start();
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(discovery.is_running());

    discovery.stop();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!discovery.is_running());

    let count = scanner.start_count();
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(scanner.start_count(), count);
}

#[tokio::test]
async fn stop_drops_an_in_flight_provisioning_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/new"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "auth_token": "abc123" }))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&mock_server)
        .await;

    let scanner = ScriptedScanner::new(vec![vec![advertisement(&mock_server)]]);
    let discovery = Discovery::new(scanner, HttpTransport::new().unwrap())
        .with_scan_intervals(Duration::from_secs(30), Duration::from_secs(30));

    discovery.start();
    // The device is registered before the token request goes out, so a
    // non-zero count means the slow POST is now in flight.
    wait_for_device_count(&discovery, 1).await;

    let begun = tokio::time::Instant::now();
    discovery.stop();
    while discovery.is_running() {
        assert!(
            begun.elapsed() < Duration::from_secs(5),
            "discovery kept running behind a slow provisioning request"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn provisioning_failure_keeps_discovery_alive() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/new"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let first = advertisement(&mock_server);
    let mut second = advertisement(&mock_server);
    second.hardware_addr = HardwareAddr::new("AA:BB:CC:DD:EE:FF");
    second.display_name = "Office Panels".to_string();

    let scanner = ScriptedScanner::new(vec![vec![first], vec![second]]);
    let discovery = Discovery::new(scanner, HttpTransport::new().unwrap())
        .with_scan_intervals(Duration::from_millis(50), Duration::from_millis(50));

    discovery.start();
    wait_for_device_count(&discovery, 2).await;
    discovery.stop();

    let device = discovery
        .device(&HardwareAddr::new("13:F6:11:72:E2:38"))
        .await
        .unwrap();
    assert_eq!(device.auth_state(), AuthState::Denied);
    assert!(device.auth_token().is_none());
}

#[tokio::test]
async fn removed_device_is_rediscovered() {
    let mock_server = MockServer::start().await;
    mount_rejecting_token_endpoint(&mock_server).await;

    let batches = vec![
        vec![advertisement(&mock_server)],
        vec![advertisement(&mock_server)],
        vec![advertisement(&mock_server)],
        vec![advertisement(&mock_server)],
    ];
    let scanner = ScriptedScanner::new(batches);
    let discovery = Discovery::new(scanner, HttpTransport::new().unwrap())
        .with_scan_intervals(Duration::from_millis(50), Duration::from_millis(50))
        .with_throttle_window(Duration::from_millis(10));

    discovery.start();
    wait_for_device_count(&discovery, 1).await;

    let addr = HardwareAddr::new("13:F6:11:72:E2:38");
    assert!(discovery.remove_device(&addr).await);
    assert_eq!(discovery.device_count().await, 0);

    // The next scan cycle re-registers the device
    wait_for_device_count(&discovery, 1).await;
    discovery.stop();
}

#[tokio::test]
async fn removal_restores_fast_scanning() {
    let mock_server = MockServer::start().await;
    mount_rejecting_token_endpoint(&mock_server).await;

    let scanner = ScriptedScanner::new(vec![vec![advertisement(&mock_server)]]);
    let discovery = Discovery::new(scanner.clone(), HttpTransport::new().unwrap())
        .with_scan_intervals(Duration::from_millis(30), Duration::from_millis(250));

    discovery.start();
    wait_for_device_count(&discovery, 1).await;

    let addr = HardwareAddr::new("13:F6:11:72:E2:38");
    assert!(discovery.remove_device(&addr).await);
    let after_removal = scanner.start_count();

    // The cycle in progress still runs out its slow window, but every
    // cycle after it sees the empty registry and uses the fast one.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(
        scanner.start_count() >= after_removal + 5,
        "scan cadence did not speed back up after removal"
    );

    discovery.stop();
}
