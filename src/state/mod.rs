// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state views.
//!
//! This module provides typed views of the state document a Nanoleaf device
//! returns. [`DeviceInfo`] covers the device identity section and
//! [`LightState`] the current light state, with each numeric field reported
//! as a [`RangedValue`] carrying the range the device accepts.
//!
//! # Examples
//!
//! ```
//! use nanor_lib::state::DeviceInfo;
//!
//! let doc = serde_json::json!({
//!     "name": "Bedroom Panels",
//!     "serialNo": "S17073A2257",
//!     "manufacturer": "Nanoleaf",
//!     "firmwareVersion": "2.2.0",
//!     "model": "NL22",
//!     "state": {"on": {"value": true}}
//! });
//!
//! let info: DeviceInfo = serde_json::from_value(doc).unwrap();
//! assert_eq!(info.state().is_on(), Some(true));
//! ```

mod device_info;

pub use device_info::{BoolValue, DeviceInfo, LightState, RangedValue};
