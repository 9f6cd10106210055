// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color types for light control.
//!
//! This module provides types for hue, saturation, color temperature, and
//! composite HSB color control on Nanoleaf devices.

use std::fmt;

use crate::error::ValueError;

use super::Brightness;

/// Color hue in degrees (0-360, where 0/360 is red).
///
/// # Examples
///
/// ```
/// use nanor_lib::types::Hue;
///
/// let hue = Hue::new(240).unwrap();
/// assert_eq!(hue.value(), 240);
///
/// assert!(Hue::new(361).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hue(u16);

impl Hue {
    /// Maximum hue value (wraps back to red).
    pub const MAX: Self = Self(360);

    /// Creates a new hue value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidHue` if value exceeds 360.
    pub fn new(value: u16) -> Result<Self, ValueError> {
        if value > 360 {
            return Err(ValueError::InvalidHue(value));
        }
        Ok(Self(value))
    }

    /// Creates a hue value, clamping to the valid range.
    #[must_use]
    pub const fn clamped(value: u16) -> Self {
        if value > 360 { Self(360) } else { Self(value) }
    }

    /// Returns the hue in degrees.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Hue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

impl TryFrom<u16> for Hue {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Color saturation as a percentage (0-100).
///
/// # Examples
///
/// ```
/// use nanor_lib::types::Saturation;
///
/// let sat = Saturation::new(80).unwrap();
/// assert_eq!(sat.value(), 80);
///
/// assert!(Saturation::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Saturation(u8);

impl Saturation {
    /// Minimum saturation (fully desaturated, white).
    pub const MIN: Self = Self(0);

    /// Maximum saturation (fully saturated).
    pub const MAX: Self = Self(100);

    /// Creates a new saturation value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidSaturation` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::InvalidSaturation(value));
        }
        Ok(Self(value))
    }

    /// Creates a saturation value, clamping to the valid range.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value > 100 { Self(100) } else { Self(value) }
    }

    /// Returns the saturation percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Saturation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Saturation {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Color temperature in Kelvin (1200-6500).
///
/// Nanoleaf panels take color temperature in Kelvin, where lower values are
/// warmer (more orange/yellow) and higher values are cooler (bluer).
///
/// - 1200K - Candlelight
/// - 2700K - Warm white
/// - 4000K - Neutral white
/// - 6500K - Daylight
///
/// # Examples
///
/// ```
/// use nanor_lib::types::ColorTemp;
///
/// // Create a neutral white color temperature
/// let ct = ColorTemp::new(4000).unwrap();
/// assert_eq!(ct.value(), 4000);
///
/// // Use predefined values
/// let warm = ColorTemp::WARM;
/// let cool = ColorTemp::DAYLIGHT;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColorTemp(u16);

impl ColorTemp {
    /// Minimum color temperature (warmest).
    pub const MIN: u16 = 1200;

    /// Maximum color temperature (coolest).
    pub const MAX: u16 = 6500;

    /// Candlelight (1200K).
    pub const CANDLE: Self = Self(1200);

    /// Warm white (2700K).
    pub const WARM: Self = Self(2700);

    /// Neutral white (4000K).
    pub const NEUTRAL: Self = Self(4000);

    /// Cool daylight (6500K).
    pub const DAYLIGHT: Self = Self(6500);

    /// Creates a new color temperature value.
    ///
    /// # Arguments
    ///
    /// * `value` - The color temperature in Kelvin (1200-6500)
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [1200, 6500].
    pub fn new(value: u16) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Creates a color temperature, clamping to the valid range.
    #[must_use]
    pub const fn clamped(value: u16) -> Self {
        if value < Self::MIN {
            Self(Self::MIN)
        } else if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    /// Returns the color temperature value in Kelvin.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl Default for ColorTemp {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for ColorTemp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}K", self.0)
    }
}

impl TryFrom<u16> for ColorTemp {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// HSB color representation (Hue, Saturation, Brightness).
///
/// # Examples
///
/// ```
/// use nanor_lib::types::HsbColor;
///
/// // Create a pure red color at full brightness
/// let red = HsbColor::new(0, 100, 100).unwrap();
/// assert_eq!(red.hue().value(), 0);
/// assert_eq!(red.saturation().value(), 100);
/// assert_eq!(red.brightness().value(), 100);
///
/// // Create a green color
/// let green = HsbColor::new(120, 100, 100).unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HsbColor {
    hue: Hue,
    saturation: Saturation,
    brightness: Brightness,
}

impl HsbColor {
    /// Creates a new HSB color.
    ///
    /// # Arguments
    ///
    /// * `hue` - Color hue (0-360 degrees, where 0/360 is red)
    /// * `saturation` - Color saturation (0-100%)
    /// * `brightness` - Color brightness (0-100%)
    ///
    /// # Errors
    ///
    /// Returns error if any value is outside its valid range.
    pub fn new(hue: u16, saturation: u8, brightness: u8) -> Result<Self, ValueError> {
        Ok(Self {
            hue: Hue::new(hue)?,
            saturation: Saturation::new(saturation)?,
            brightness: Brightness::new(brightness)?,
        })
    }

    /// Creates an HSB color from already-validated components.
    #[must_use]
    pub const fn from_parts(hue: Hue, saturation: Saturation, brightness: Brightness) -> Self {
        Self {
            hue,
            saturation,
            brightness,
        }
    }

    /// Creates a pure red color at full brightness.
    #[must_use]
    pub const fn red() -> Self {
        Self::from_parts(
            Hue::clamped(0),
            Saturation::clamped(100),
            Brightness::clamped(100),
        )
    }

    /// Creates a pure green color at full brightness.
    #[must_use]
    pub const fn green() -> Self {
        Self::from_parts(
            Hue::clamped(120),
            Saturation::clamped(100),
            Brightness::clamped(100),
        )
    }

    /// Creates a pure blue color at full brightness.
    #[must_use]
    pub const fn blue() -> Self {
        Self::from_parts(
            Hue::clamped(240),
            Saturation::clamped(100),
            Brightness::clamped(100),
        )
    }

    /// Creates a white color (no saturation).
    #[must_use]
    pub const fn white() -> Self {
        Self::from_parts(
            Hue::clamped(0),
            Saturation::clamped(0),
            Brightness::clamped(100),
        )
    }

    /// Returns the hue component.
    #[must_use]
    pub const fn hue(&self) -> Hue {
        self.hue
    }

    /// Returns the saturation component.
    #[must_use]
    pub const fn saturation(&self) -> Saturation {
        self.saturation
    }

    /// Returns the brightness component.
    #[must_use]
    pub const fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Creates a new color with a different hue.
    ///
    /// # Errors
    ///
    /// Returns error if hue is greater than 360.
    pub fn with_hue(&self, hue: u16) -> Result<Self, ValueError> {
        Ok(Self {
            hue: Hue::new(hue)?,
            ..*self
        })
    }

    /// Creates a new color with a different saturation.
    ///
    /// # Errors
    ///
    /// Returns error if saturation is greater than 100.
    pub fn with_saturation(&self, saturation: u8) -> Result<Self, ValueError> {
        Ok(Self {
            saturation: Saturation::new(saturation)?,
            ..*self
        })
    }

    /// Creates a new color with a different brightness.
    ///
    /// # Errors
    ///
    /// Returns error if brightness is greater than 100.
    pub fn with_brightness(&self, brightness: u8) -> Result<Self, ValueError> {
        Ok(Self {
            brightness: Brightness::new(brightness)?,
            ..*self
        })
    }
}

impl Default for HsbColor {
    fn default() -> Self {
        Self::white()
    }
}

impl fmt::Display for HsbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HSB({}, {}%, {}%)",
            self.hue.value(),
            self.saturation.value(),
            self.brightness.value()
        )
    }
}
