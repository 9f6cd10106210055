// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Nanoleaf device control.
//!
//! This module provides type-safe representations of values used in device
//! commands. Each type ensures values are within their valid ranges at
//! construction time, preventing runtime errors.
//!
//! # Types
//!
//! - [`HardwareAddr`] - Stable device identity from advertisements
//! - [`Brightness`] - Light output level (0-100%)
//! - [`Hue`] - Color hue (0-360 degrees)
//! - [`Saturation`] - Color saturation (0-100%)
//! - [`ColorTemp`] - Color temperature in Kelvin (1200-6500)
//! - [`HsbColor`] - HSB color composite
//! - [`RgbColor`] - RGB color with hex/name parsing and HSB conversion

mod brightness;
mod color;
mod hardware_addr;
mod rgb_color;

pub use brightness::Brightness;
pub use color::{ColorTemp, HsbColor, Hue, Saturation};
pub use hardware_addr::HardwareAddr;
pub use rgb_color::RgbColor;
