// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hardware address type.

use std::borrow::Borrow;
use std::fmt;

/// Hardware address of a Nanoleaf device.
///
/// This is the `NL-DEVICEID` value a device advertises, typically a
/// MAC-address-like string such as `13:F6:11:72:E2:38`. It is the stable
/// identity of a device across IP address and name changes, and the key by
/// which the registry tracks devices.
///
/// The wrapper provides a distinct type for device identification,
/// preventing accidental confusion with display names or endpoints.
///
/// # Examples
///
/// ```
/// use nanor_lib::types::HardwareAddr;
///
/// let addr = HardwareAddr::new("13:F6:11:72:E2:38");
/// println!("Device: {}", addr);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HardwareAddr(String);

impl HardwareAddr {
    /// Creates a hardware address from an advertised device ID.
    #[must_use]
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HardwareAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HardwareAddr({})", self.0)
    }
}

impl fmt::Display for HardwareAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for HardwareAddr {
    fn from(addr: String) -> Self {
        Self(addr)
    }
}

impl From<&str> for HardwareAddr {
    fn from(addr: &str) -> Self {
        Self(addr.to_string())
    }
}

impl From<HardwareAddr> for String {
    fn from(addr: HardwareAddr) -> Self {
        addr.0
    }
}

impl Borrow<str> for HardwareAddr {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for HardwareAddr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
