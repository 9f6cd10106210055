// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use crate::types::HardwareAddr;

/// Events emitted during discovery and provisioning.
///
/// These events notify subscribers when devices appear on the network,
/// change their advertised name or location, and complete token
/// provisioning. All events include the hardware address for targeted
/// handling; the registry resolves addresses back to device handles.
///
/// # Examples
///
/// ```
/// use nanor_lib::event::DeviceEvent;
/// use nanor_lib::types::HardwareAddr;
///
/// let addr = HardwareAddr::new("13:F6:11:72:E2:38");
///
/// // Lifecycle events
/// let new = DeviceEvent::new_device(addr.clone(), "Bedroom", "http://192.168.4.159:16021");
/// let changed = DeviceEvent::changed_device(addr.clone(), "Bedroom", "http://192.168.4.23:16021");
///
/// // Provisioning events
/// let created = DeviceEvent::user_created(addr);
/// ```
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    /// A device was seen on the network for the first time.
    NewDevice {
        /// Hardware address of the device.
        hardware_addr: HardwareAddr,
        /// Advertised display name.
        name: String,
        /// Base URL of the device's control API.
        endpoint: String,
    },

    /// A known device advertised a new name or location.
    ChangedDevice {
        /// Hardware address of the device.
        hardware_addr: HardwareAddr,
        /// Advertised display name after the change.
        name: String,
        /// Base URL of the device's control API after the change.
        endpoint: String,
    },

    /// An authorization token was stored for a device.
    ///
    /// Emitted both when provisioning succeeds and when a previously
    /// obtained token is seeded manually.
    AuthTokenGenerated {
        /// Hardware address of the device.
        hardware_addr: HardwareAddr,
    },

    /// The device accepted a create-user request.
    ///
    /// Always preceded by [`AuthTokenGenerated`](Self::AuthTokenGenerated)
    /// for the same device.
    UserCreated {
        /// Hardware address of the device.
        hardware_addr: HardwareAddr,
    },
}

impl DeviceEvent {
    /// Returns the hardware address associated with this event.
    #[must_use]
    pub fn hardware_addr(&self) -> &HardwareAddr {
        match self {
            Self::NewDevice { hardware_addr, .. }
            | Self::ChangedDevice { hardware_addr, .. }
            | Self::AuthTokenGenerated { hardware_addr }
            | Self::UserCreated { hardware_addr } => hardware_addr,
        }
    }

    /// Returns `true` if this is a device lifecycle event (new/changed).
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::NewDevice { .. } | Self::ChangedDevice { .. })
    }

    /// Returns `true` if this is a provisioning event.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::AuthTokenGenerated { .. } | Self::UserCreated { .. }
        )
    }

    /// Creates a new-device event.
    #[must_use]
    pub fn new_device(
        hardware_addr: HardwareAddr,
        name: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self::NewDevice {
            hardware_addr,
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Creates a changed-device event.
    #[must_use]
    pub fn changed_device(
        hardware_addr: HardwareAddr,
        name: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self::ChangedDevice {
            hardware_addr,
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Creates an auth-token-generated event.
    #[must_use]
    pub fn auth_token_generated(hardware_addr: HardwareAddr) -> Self {
        Self::AuthTokenGenerated { hardware_addr }
    }

    /// Creates a user-created event.
    #[must_use]
    pub fn user_created(hardware_addr: HardwareAddr) -> Self {
        Self::UserCreated { hardware_addr }
    }
}
