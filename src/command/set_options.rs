// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level state change requests.
//!
//! This module provides [`SetOptions`], a builder describing a desired light
//! state change, and the composition logic that turns it into the per-field
//! updates the device actually accepts.

use crate::types::{Brightness, ColorTemp, HsbColor, Hue, RgbColor, Saturation};

use super::{FieldUpdate, StateField};

/// A desired light state change.
///
/// Any combination of fields may be requested; fields that are not set are
/// left untouched on the device. A color request is decomposed into hue,
/// saturation, and (policy permitting) brightness, with explicitly set
/// fields always taking precedence over color-derived ones.
///
/// # Examples
///
/// ```
/// use nanor_lib::command::SetOptions;
/// use nanor_lib::types::{Brightness, RgbColor};
///
/// // Fade to half brightness over 2 seconds
/// let options = SetOptions::new()
///     .with_brightness(Brightness::new(50).unwrap())
///     .with_duration(2);
///
/// // Turn on and go deep blue
/// let options = SetOptions::new()
///     .with_power(true)
///     .with_color(RgbColor::from_name("blue").unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// Desired power state.
    power: Option<bool>,
    /// Desired brightness level.
    brightness: Option<Brightness>,
    /// Desired hue.
    hue: Option<Hue>,
    /// Desired saturation.
    saturation: Option<Saturation>,
    /// Desired color temperature.
    color_temp: Option<ColorTemp>,
    /// Desired color, decomposed into HSB during composition.
    color: Option<RgbColor>,
    /// Transition duration in seconds for the non-power fields.
    duration: Option<u16>,
}

impl SetOptions {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a power state.
    #[must_use]
    pub fn with_power(mut self, on: bool) -> Self {
        self.power = Some(on);
        self
    }

    /// Requests a brightness level.
    #[must_use]
    pub fn with_brightness(mut self, brightness: Brightness) -> Self {
        self.brightness = Some(brightness);
        self
    }

    /// Requests a hue.
    #[must_use]
    pub fn with_hue(mut self, hue: Hue) -> Self {
        self.hue = Some(hue);
        self
    }

    /// Requests a saturation.
    #[must_use]
    pub fn with_saturation(mut self, saturation: Saturation) -> Self {
        self.saturation = Some(saturation);
        self
    }

    /// Requests a color temperature.
    #[must_use]
    pub fn with_color_temp(mut self, color_temp: ColorTemp) -> Self {
        self.color_temp = Some(color_temp);
        self
    }

    /// Requests a color.
    ///
    /// The color is decomposed into hue and saturation during composition.
    /// Whether its brightness channel is applied as well depends on the
    /// device handle's color-brightness policy.
    #[must_use]
    pub fn with_color(mut self, color: RgbColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the transition duration in seconds.
    ///
    /// The duration applies to every composed field except power.
    #[must_use]
    pub fn with_duration(mut self, duration: u16) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Returns `true` if no field was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.power.is_none()
            && self.brightness.is_none()
            && self.hue.is_none()
            && self.saturation.is_none()
            && self.color_temp.is_none()
            && self.color.is_none()
    }

    /// Composes this request into per-field updates.
    ///
    /// Explicitly requested fields are emitted first as-is. A requested
    /// color then fills in hue and saturation where they were not set
    /// explicitly, and fills in brightness only when it was not set
    /// explicitly and `allow_color_brightness` is `true`.
    ///
    /// The returned updates are ordered brightness, hue, saturation, color
    /// temperature, power; absent fields are omitted entirely.
    #[must_use]
    pub fn compose(&self, allow_color_brightness: bool) -> Vec<FieldUpdate> {
        let mut brightness = self.brightness;
        let mut hue = self.hue;
        let mut saturation = self.saturation;

        if let Some(color) = self.color {
            let hsb: HsbColor = color.to_hsb();
            if hue.is_none() {
                hue = Some(hsb.hue());
            }
            if saturation.is_none() {
                saturation = Some(hsb.saturation());
            }
            if brightness.is_none() && allow_color_brightness {
                brightness = Some(hsb.brightness());
            }
        }

        let mut updates = Vec::new();
        if let Some(value) = brightness {
            updates.push(self.transition(StateField::Brightness, value.value()));
        }
        if let Some(value) = hue {
            updates.push(self.transition(StateField::Hue, value.value()));
        }
        if let Some(value) = saturation {
            updates.push(self.transition(StateField::Saturation, value.value()));
        }
        if let Some(value) = self.color_temp {
            updates.push(self.transition(StateField::ColorTemp, value.value()));
        }
        if let Some(on) = self.power {
            // The device rejects a duration on the power field
            updates.push(FieldUpdate::new(StateField::On, on));
        }

        updates
    }

    fn transition(&self, field: StateField, value: impl Into<serde_json::Value>) -> FieldUpdate {
        let update = FieldUpdate::new(field, value);
        match self.duration {
            Some(duration) => update.with_duration(duration),
            None => update,
        }
    }
}
