// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `NanoR` Lib - A Rust library to discover and control Nanoleaf light panels.
//!
//! This library finds Nanoleaf controllers on the local network via SSDP,
//! provisions auth tokens for their HTTP API, and controls panel state.
//!
//! # Supported Features
//!
//! - **Auto-discovery**: Background SSDP scanning with a fast cadence until
//!   the first device is found, then a slow steady cadence
//! - **Authorization**: Lazy token provisioning on the first command, plus
//!   token revocation
//! - **Light control**: Power, brightness, hue, saturation, color
//!   temperature, and RGB colors with transition durations
//! - **State queries**: Raw and typed state documents, cached per device
//! - **Events**: Broadcast notifications for discovery and authorization
//!
//! # Quick Start
//!
//! ## Controlling a known device
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use nanor_lib::protocol::HttpTransport;
//! use nanor_lib::{Device, HardwareAddr, RgbColor};
//!
//! #[tokio::main]
//! async fn main() -> nanor_lib::Result<()> {
//!     let transport = Arc::new(HttpTransport::new()?);
//!     let device = Device::new(
//!         transport,
//!         HardwareAddr::new("13:F6:11:72:E2:38"),
//!         "Bedroom Panels",
//!         "http://192.168.4.159:16021",
//!     );
//!
//!     // The first command provisions an auth token. Hold the power button
//!     // for 5-7 seconds beforehand so the controller accepts the request.
//!     device.power_on().await?;
//!     device.set_color(RgbColor::from_hex("#1E90FF")?).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Discovering devices
//!
//! ```no_run
//! use nanor_lib::{DeviceEvent, Discovery};
//!
//! #[tokio::main]
//! async fn main() -> nanor_lib::Result<()> {
//!     let discovery = Discovery::ssdp()?;
//!     let mut events = discovery.subscribe();
//!
//!     discovery.start();
//!
//!     while let Ok(event) = events.recv().await {
//!         if let DeviceEvent::NewDevice { hardware_addr, name, .. } = event {
//!             println!("found {name} ({hardware_addr})");
//!             if let Some(device) = discovery.device(&hardware_addr).await {
//!                 device.identify().await?;
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod command;
mod device;
pub mod discovery;
pub mod error;
pub mod event;
pub mod protocol;
pub mod state;
pub mod types;

pub use command::{FieldUpdate, SetOptions, StateField};
pub use device::{AuthState, Device, FieldOutcome};
pub use discovery::Discovery;
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
pub use event::{DeviceEvent, EventBus};
pub use protocol::{HttpTransport, SsdpScanner};
pub use state::{DeviceInfo, LightState};
pub use types::{Brightness, ColorTemp, HardwareAddr, HsbColor, Hue, RgbColor, Saturation};
