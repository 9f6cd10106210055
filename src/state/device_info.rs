// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed views of the device-state document.

/// Identity and state of a Nanoleaf device, as reported by the device's
/// state endpoint.
///
/// This is a typed view of the JSON document returned by
/// `GET /api/v1/<token>`. Sections this library does not model (effects,
/// panel layout, rhythm) are ignored during parsing;
/// [`Device::get_state`](crate::Device::get_state) exposes the raw document
/// for callers that need them.
///
/// # Examples
///
/// ```
/// use nanor_lib::state::DeviceInfo;
///
/// let doc = serde_json::json!({
///     "name": "Bedroom Panels",
///     "serialNo": "S17073A2257",
///     "manufacturer": "Nanoleaf",
///     "firmwareVersion": "2.2.0",
///     "model": "NL22",
///     "state": {
///         "on": {"value": true},
///         "brightness": {"value": 100, "max": 100, "min": 0}
///     }
/// });
///
/// let info: DeviceInfo = serde_json::from_value(doc).unwrap();
/// assert_eq!(info.name(), "Bedroom Panels");
/// assert_eq!(info.state().is_on(), Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    /// Device display name.
    name: String,
    /// Serial number.
    serial_no: String,
    /// Manufacturer name.
    manufacturer: String,
    /// Hardware model identifier.
    model: String,
    /// Installed firmware version.
    firmware_version: String,
    /// Current light state.
    #[serde(default)]
    state: LightState,
}

impl DeviceInfo {
    /// Returns the device display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the device serial number.
    #[must_use]
    pub fn serial_no(&self) -> &str {
        &self.serial_no
    }

    /// Returns the manufacturer name.
    #[must_use]
    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    /// Returns the hardware model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the installed firmware version.
    #[must_use]
    pub fn firmware_version(&self) -> &str {
        &self.firmware_version
    }

    /// Returns the current light state.
    #[must_use]
    pub fn state(&self) -> &LightState {
        &self.state
    }
}

/// Current light state of a device.
///
/// All fields are optional because firmware versions differ in what they
/// report. Note the device reports saturation under the abbreviated key
/// `sat`, while the write side of the API spells out `saturation`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightState {
    /// Power state.
    #[serde(default)]
    on: Option<BoolValue>,
    /// Brightness level with its valid range.
    #[serde(default)]
    brightness: Option<RangedValue>,
    /// Hue with its valid range.
    #[serde(default)]
    hue: Option<RangedValue>,
    /// Saturation with its valid range.
    #[serde(default, rename = "sat")]
    saturation: Option<RangedValue>,
    /// Color temperature with its valid range.
    #[serde(default)]
    ct: Option<RangedValue>,
    /// Active color mode (`hs`, `ct`, or `effect`).
    #[serde(default)]
    color_mode: Option<String>,
}

impl LightState {
    /// Returns the power state, if reported.
    #[must_use]
    pub fn is_on(&self) -> Option<bool> {
        self.on.map(|b| b.value)
    }

    /// Returns the brightness, if reported.
    #[must_use]
    pub fn brightness(&self) -> Option<RangedValue> {
        self.brightness
    }

    /// Returns the hue, if reported.
    #[must_use]
    pub fn hue(&self) -> Option<RangedValue> {
        self.hue
    }

    /// Returns the saturation, if reported.
    #[must_use]
    pub fn saturation(&self) -> Option<RangedValue> {
        self.saturation
    }

    /// Returns the color temperature, if reported.
    #[must_use]
    pub fn color_temp(&self) -> Option<RangedValue> {
        self.ct
    }

    /// Returns the active color mode, if reported.
    #[must_use]
    pub fn color_mode(&self) -> Option<&str> {
        self.color_mode.as_deref()
    }
}

/// A reported value together with the range the device accepts for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct RangedValue {
    /// Current value.
    value: u16,
    /// Maximum accepted value.
    max: u16,
    /// Minimum accepted value.
    min: u16,
}

impl RangedValue {
    /// Returns the current value.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.value
    }

    /// Returns the maximum accepted value.
    #[must_use]
    pub const fn max(&self) -> u16 {
        self.max
    }

    /// Returns the minimum accepted value.
    #[must_use]
    pub const fn min(&self) -> u16 {
        self.min
    }
}

/// A reported boolean value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct BoolValue {
    /// Current value.
    value: bool,
}

impl BoolValue {
    /// Returns the current value.
    #[must_use]
    pub const fn value(&self) -> bool {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_doc() -> serde_json::Value {
        serde_json::json!({
            "name": "Bedroom Panels",
            "serialNo": "S17073A2257",
            "manufacturer": "Nanoleaf",
            "firmwareVersion": "2.2.0",
            "model": "NL22",
            "state": {
                "on": {"value": true},
                "brightness": {"value": 80, "max": 100, "min": 0},
                "hue": {"value": 240, "max": 360, "min": 0},
                "sat": {"value": 100, "max": 100, "min": 0},
                "ct": {"value": 4000, "max": 6500, "min": 1200},
                "colorMode": "hs"
            },
            "effects": {
                "select": "*Solid*",
                "effectsList": ["Flames", "Forest"]
            }
        })
    }

    #[test]
    fn parse_full_document() {
        let info: DeviceInfo = serde_json::from_value(full_doc()).unwrap();

        assert_eq!(info.name(), "Bedroom Panels");
        assert_eq!(info.serial_no(), "S17073A2257");
        assert_eq!(info.manufacturer(), "Nanoleaf");
        assert_eq!(info.model(), "NL22");
        assert_eq!(info.firmware_version(), "2.2.0");

        let state = info.state();
        assert_eq!(state.is_on(), Some(true));
        assert_eq!(state.brightness().unwrap().value(), 80);
        assert_eq!(state.hue().unwrap().value(), 240);
        assert_eq!(state.color_temp().unwrap().value(), 4000);
        assert_eq!(state.color_mode(), Some("hs"));
    }

    #[test]
    fn saturation_parses_from_abbreviated_key() {
        let info: DeviceInfo = serde_json::from_value(full_doc()).unwrap();

        let sat = info.state().saturation().unwrap();
        assert_eq!(sat.value(), 100);
        assert_eq!(sat.max(), 100);
        assert_eq!(sat.min(), 0);
    }

    #[test]
    fn parse_document_without_state() {
        let doc = serde_json::json!({
            "name": "Bare Panels",
            "serialNo": "S00000A0000",
            "manufacturer": "Nanoleaf",
            "firmwareVersion": "1.5.0",
            "model": "NL22"
        });

        let info: DeviceInfo = serde_json::from_value(doc).unwrap();
        assert_eq!(info.state().is_on(), None);
        assert_eq!(info.state().brightness(), None);
    }

    #[test]
    fn parse_partial_state() {
        let doc = serde_json::json!({
            "name": "Old Firmware",
            "serialNo": "S00000A0001",
            "manufacturer": "Nanoleaf",
            "firmwareVersion": "1.0.0",
            "model": "NL22",
            "state": {
                "on": {"value": false}
            }
        });

        let info: DeviceInfo = serde_json::from_value(doc).unwrap();
        assert_eq!(info.state().is_on(), Some(false));
        assert_eq!(info.state().hue(), None);
        assert_eq!(info.state().color_mode(), None);
    }

    #[test]
    fn ranged_value_bounds() {
        let value: RangedValue =
            serde_json::from_value(serde_json::json!({"value": 50, "max": 100, "min": 0}))
                .unwrap();
        assert_eq!(value.value(), 50);
        assert_eq!(value.max(), 100);
        assert_eq!(value.min(), 0);
    }
}
