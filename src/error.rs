// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `NanoR` library.
//!
//! This module provides a comprehensive error hierarchy for handling failures
//! across the library: value validation, protocol communication, JSON parsing,
//! and device operations.

use thiserror::Error;

/// The top-level error type for this library.
///
/// Every failure mode in discovery, provisioning, and control converts
/// into one of these variants, so fallible APIs can share one `Result`
/// alias.
#[derive(Debug, Error)]
pub enum Error {
    /// A constrained value failed validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Talking to a device over HTTP or SSDP failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A device response could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A device-level operation failed.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Validation errors for constrained values.
///
/// Returned when constructing a typed value, such as a brightness level
/// or a hex color, from input outside its allowed range or format.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A hue value is outside the valid range (0-360).
    #[error("hue value {0} is out of range [0, 360]")]
    InvalidHue(u16),

    /// A saturation value is outside the valid range (0-100).
    #[error("saturation value {0} is out of range [0, 100]")]
    InvalidSaturation(u8),

    /// A brightness value is outside the valid range (0-100).
    #[error("brightness value {0} is out of range [0, 100]")]
    InvalidBrightness(u8),

    /// A hex color string could not be parsed.
    #[error("invalid hex color: {0}")]
    InvalidHexColor(String),

    /// A color name is not in the known color table.
    #[error("unknown color name: {0}")]
    UnknownColorName(String),
}

/// Transport-level failures for HTTP requests and SSDP scans.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Socket I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The device rejected the request as malformed (HTTP 400).
    ///
    /// During provisioning this is the status the device returns while its
    /// link button has not been pressed.
    #[error("device rejected the request (bad request)")]
    BadRequest,

    /// Authentication failed (HTTP 401).
    #[error("authentication failed")]
    AuthenticationFailed,
}

/// Failures while decoding a device response body.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Operational failures reported at the device level.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device has no authorization token and provisioning failed.
    #[error(
        "device {hardware_addr} is not authorized: press and hold the power button for 5-7 seconds, then retry"
    )]
    NotAuthorized {
        /// Hardware address of the device that refused authorization.
        hardware_addr: String,
    },

    /// The device rejected an unauthenticated create-user request.
    #[error("link button not pressed on device at {endpoint}")]
    LinkButtonNotPressed {
        /// Base URL of the device that rejected the request.
        endpoint: String,
    },
}

/// Result alias used by the fallible APIs in this library.
pub type Result<T> = std::result::Result<T, Error>;
