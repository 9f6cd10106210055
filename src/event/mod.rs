// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for discovery and provisioning notifications.
//!
//! The discovery loop and every [`Device`](crate::Device) publish onto a
//! shared [`EventBus`], a thin wrapper over tokio's broadcast channel.
//! Subscribing yields a receiver that observes [`DeviceEvent`]s from all
//! of them.
//!
//! # Examples
//!
//! ```
//! use nanor_lib::event::{DeviceEvent, EventBus};
//! use nanor_lib::types::HardwareAddr;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! let addr = HardwareAddr::new("13:F6:11:72:E2:38");
//! bus.publish(DeviceEvent::new_device(addr, "Bedroom", "http://192.168.4.159:16021"));
//! ```

mod device_event;
mod event_bus;

pub use device_event::DeviceEvent;
pub use event_bus::EventBus;
