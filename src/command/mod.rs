// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Nanoleaf state command definitions.
//!
//! This module provides the building blocks for the `PUT /state` control
//! calls: the writable state fields, single-field update payloads, and the
//! [`SetOptions`] request that composes a high-level change into per-field
//! updates.
//!
//! # Writable Fields
//!
//! | Field | Wire key | Range |
//! |-------|----------|-------|
//! | [`StateField::Brightness`] | `brightness` | 0-100 |
//! | [`StateField::Hue`] | `hue` | 0-360 |
//! | [`StateField::Saturation`] | `saturation` | 0-100 |
//! | [`StateField::ColorTemp`] | `ct` | 1200-6500 |
//! | [`StateField::On`] | `on` | true/false |
//!
//! # Update Structure
//!
//! Each field is written with its own request body of the form
//! `{"<key>": {"value": <v>, "duration": <seconds>}}`, where `duration` is
//! optional and requests a gradual transition. The device does not accept a
//! duration on the power field.
//!
//! # Examples
//!
//! ```
//! use nanor_lib::command::{FieldUpdate, SetOptions, StateField};
//! use nanor_lib::types::Brightness;
//!
//! // A single raw field update
//! let update = FieldUpdate::new(StateField::Brightness, 75).with_duration(2);
//! assert_eq!(
//!     update.to_body(),
//!     serde_json::json!({"brightness": {"value": 75, "duration": 2}})
//! );
//!
//! // A high-level request composed into per-field updates
//! let options = SetOptions::new()
//!     .with_brightness(Brightness::new(50).unwrap())
//!     .with_power(true);
//! let updates = options.compose(true);
//! assert_eq!(updates.len(), 2);
//! ```

use std::fmt;

mod set_options;

pub use set_options::SetOptions;

/// A writable field of the device light state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateField {
    /// Light output level (0-100).
    Brightness,
    /// Color hue in degrees (0-360).
    Hue,
    /// Color saturation (0-100).
    Saturation,
    /// Color temperature in Kelvin (1200-6500).
    ColorTemp,
    /// Power state.
    On,
}

impl StateField {
    /// Returns the JSON key the device expects for this field.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::ColorTemp => "ct",
            Self::On => "on",
        }
    }
}

impl fmt::Display for StateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single-field write against the device state endpoint.
///
/// Each update carries one field, its new value, and an optional transition
/// duration in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    field: StateField,
    value: serde_json::Value,
    duration: Option<u16>,
}

impl FieldUpdate {
    /// Creates an update setting `field` to `value`.
    #[must_use]
    pub fn new(field: StateField, value: impl Into<serde_json::Value>) -> Self {
        Self {
            field,
            value: value.into(),
            duration: None,
        }
    }

    /// Attaches a transition duration in seconds.
    #[must_use]
    pub fn with_duration(mut self, duration: u16) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Returns the field this update writes.
    #[must_use]
    pub const fn field(&self) -> StateField {
        self.field
    }

    /// Returns the value being written.
    #[must_use]
    pub const fn value(&self) -> &serde_json::Value {
        &self.value
    }

    /// Returns the transition duration, if any.
    #[must_use]
    pub const fn duration(&self) -> Option<u16> {
        self.duration
    }

    /// Builds the request body for the state endpoint.
    #[must_use]
    pub fn to_body(&self) -> serde_json::Value {
        let mut inner = serde_json::json!({ "value": self.value.clone() });
        if let Some(duration) = self.duration {
            inner["duration"] = duration.into();
        }
        serde_json::json!({ self.field.key(): inner })
    }
}
