// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level device abstraction for Nanoleaf light panels.
//!
//! A [`Device`] wraps one discovered controller: its hardware address, its
//! HTTP endpoint, and the auth token that unlocks the API. Tokens are
//! provisioned lazily on the first command, so callers normally never deal
//! with authorization at all.
//!
//! # Authorization
//!
//! The Nanoleaf API only hands out tokens while the controller is in
//! pairing mode (hold the power button for 5-7 seconds). Outside that
//! window a token request is rejected and commands fail with
//! [`DeviceError::NotAuthorized`].
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use nanor_lib::protocol::HttpTransport;
//! use nanor_lib::{Device, HardwareAddr};
//!
//! # async fn example() -> nanor_lib::Result<()> {
//! let transport = Arc::new(HttpTransport::new()?);
//! let device = Device::new(
//!     transport,
//!     HardwareAddr::new("13:F6:11:72:E2:38"),
//!     "Bedroom Panels",
//!     "http://192.168.4.159:16021",
//! );
//!
//! // Requests a token on first use, then turns the panels on.
//! device.power_on().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{Mutex, broadcast};

use crate::command::{SetOptions, StateField};
use crate::error::{DeviceError, Error, ParseError, ProtocolError};
use crate::event::{DeviceEvent, EventBus};
use crate::protocol::Transport;
use crate::state::DeviceInfo;
use crate::types::{Brightness, ColorTemp, HardwareAddr, Hue, RgbColor, Saturation};

/// Authorization lifecycle of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No token is held and no request has been made yet.
    Unauthorized,
    /// A token request is in flight.
    Provisioning,
    /// A token is held; commands can be sent.
    Authorized,
    /// The last token request was rejected.
    Denied,
}

/// Per-field result of a confirmed state update.
///
/// Returned by [`Device::set_confirmed`]; each entry reports whether the
/// device accepted the update for one field.
#[derive(Debug)]
pub struct FieldOutcome {
    /// State field the update addressed.
    pub field: StateField,
    /// Transport outcome for that field.
    pub result: Result<(), ProtocolError>,
}

/// Mutable device data behind the shared lock.
#[derive(Debug)]
struct DeviceShared {
    name: String,
    endpoint: String,
    auth_token: Option<String>,
    auth_state: AuthState,
    allow_color_brightness: bool,
    last_known_state: Option<serde_json::Value>,
}

/// A Nanoleaf controller on the local network.
///
/// Cloning a `Device` is cheap and both clones share the same token and
/// cached state, so a device handed out by
/// [`Discovery`](crate::Discovery) stays in sync with the registry.
#[derive(Debug)]
pub struct Device<T: Transport> {
    transport: Arc<T>,
    hardware_addr: HardwareAddr,
    shared: Arc<RwLock<DeviceShared>>,
    provision_lock: Arc<Mutex<()>>,
    events: EventBus,
}

impl<T: Transport> Device<T> {
    /// Creates a device from its advertised identity.
    #[must_use]
    pub fn new(
        transport: Arc<T>,
        hardware_addr: HardwareAddr,
        name: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self::with_event_bus(transport, hardware_addr, name, endpoint, EventBus::new())
    }

    /// Creates a device publishing its events on an existing bus.
    #[must_use]
    pub fn with_event_bus(
        transport: Arc<T>,
        hardware_addr: HardwareAddr,
        name: impl Into<String>,
        endpoint: impl Into<String>,
        events: EventBus,
    ) -> Self {
        Self {
            transport,
            hardware_addr,
            shared: Arc::new(RwLock::new(DeviceShared {
                name: name.into(),
                endpoint: endpoint.into(),
                auth_token: None,
                auth_state: AuthState::Unauthorized,
                allow_color_brightness: true,
                last_known_state: None,
            })),
            provision_lock: Arc::new(Mutex::new(())),
            events,
        }
    }

    // ========== Identity ==========

    /// Returns the hardware address identifying this device.
    #[must_use]
    pub fn hardware_addr(&self) -> &HardwareAddr {
        &self.hardware_addr
    }

    /// Returns the advertised display name.
    #[must_use]
    pub fn name(&self) -> String {
        self.shared.read().name.clone()
    }

    /// Returns the HTTP endpoint, e.g. `http://192.168.4.159:16021`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.shared.read().endpoint.clone()
    }

    pub(crate) fn set_display_name(&self, name: impl Into<String>) {
        self.shared.write().name = name.into();
    }

    pub(crate) fn set_endpoint(&self, endpoint: impl Into<String>) {
        self.shared.write().endpoint = endpoint.into();
    }

    // ========== Authorization ==========

    /// Returns the current auth token, if one is held.
    #[must_use]
    pub fn auth_token(&self) -> Option<String> {
        self.shared.read().auth_token.clone()
    }

    /// Returns the current authorization state.
    #[must_use]
    pub fn auth_state(&self) -> AuthState {
        self.shared.read().auth_state
    }

    /// Returns `true` if a token is held.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.shared.read().auth_token.is_some()
    }

    /// Installs a previously saved auth token.
    ///
    /// Lets callers skip pairing when a token from an earlier session is
    /// still valid. Publishes [`DeviceEvent::AuthTokenGenerated`].
    pub fn set_auth_token(&self, token: impl Into<String>) {
        {
            let mut shared = self.shared.write();
            shared.auth_token = Some(token.into());
            shared.auth_state = AuthState::Authorized;
        }
        self.events
            .publish(DeviceEvent::auth_token_generated(self.hardware_addr.clone()));
    }

    /// Requests a new auth token from the device.
    ///
    /// The controller must be in pairing mode (power button held for 5-7
    /// seconds) or it rejects the request. Does nothing if a token is
    /// already held. On success publishes
    /// [`DeviceEvent::AuthTokenGenerated`] followed by
    /// [`DeviceEvent::UserCreated`].
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::LinkButtonNotPressed`] if the device rejects
    /// the request, or a parse error if the response carries no token.
    pub async fn create_user(&self) -> Result<(), Error> {
        if self.shared.read().auth_token.is_some() {
            return Ok(());
        }

        let url = {
            let mut shared = self.shared.write();
            shared.auth_state = AuthState::Provisioning;
            format!("{}/api/v1/new", shared.endpoint)
        };

        tracing::debug!(hardware_addr = %self.hardware_addr, "Requesting auth token");

        match self.request_token(&url).await {
            Ok(token) => {
                {
                    let mut shared = self.shared.write();
                    shared.auth_token = Some(token);
                    shared.auth_state = AuthState::Authorized;
                }
                self.events
                    .publish(DeviceEvent::auth_token_generated(self.hardware_addr.clone()));
                self.events
                    .publish(DeviceEvent::user_created(self.hardware_addr.clone()));
                Ok(())
            }
            Err(error) => {
                self.shared.write().auth_state = AuthState::Denied;
                Err(error)
            }
        }
    }

    /// Revokes the device's auth token.
    ///
    /// Does nothing if no token is held. On success the token is cleared
    /// and the device returns to [`AuthState::Unauthorized`]; the next
    /// command provisions a fresh token.
    ///
    /// # Errors
    ///
    /// Returns error if the revocation request fails. The token is kept in
    /// that case so the call can be retried.
    pub async fn delete_user(&self) -> Result<(), Error> {
        let Some(token) = self.auth_token() else {
            return Ok(());
        };

        let url = format!("{}/api/v1/{}", self.endpoint(), token);
        self.transport.delete(&url).await.map_err(Error::Protocol)?;

        {
            let mut shared = self.shared.write();
            shared.auth_token = None;
            shared.auth_state = AuthState::Unauthorized;
        }
        tracing::debug!(hardware_addr = %self.hardware_addr, "Auth token revoked");
        Ok(())
    }

    async fn request_token(&self, url: &str) -> Result<String, Error> {
        let response = self.transport.post(url).await.map_err(|error| {
            tracing::debug!(
                hardware_addr = %self.hardware_addr,
                error = %error,
                "Token request rejected"
            );
            Error::Device(DeviceError::LinkButtonNotPressed {
                endpoint: self.endpoint(),
            })
        })?;

        let body: serde_json::Value = response.parse().map_err(Error::Parse)?;
        let token = body
            .get("auth_token")
            .ok_or_else(|| ParseError::MissingField("auth_token".to_string()))
            .map_err(Error::Parse)?;
        token
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| ParseError::UnexpectedFormat("auth_token is not a string".to_string()))
            .map_err(Error::Parse)
    }

    /// Returns the held token, provisioning one if necessary.
    ///
    /// Concurrent callers are serialized so a burst of commands against an
    /// unauthorized device requests exactly one token.
    async fn ensure_authorized(&self) -> Result<String, Error> {
        if let Some(token) = self.auth_token() {
            return Ok(token);
        }

        let _guard = self.provision_lock.lock().await;
        if let Some(token) = self.auth_token() {
            return Ok(token);
        }

        if let Err(error) = self.create_user().await {
            tracing::debug!(
                hardware_addr = %self.hardware_addr,
                error = %error,
                "Authorization failed"
            );
            return Err(self.not_authorized());
        }

        self.auth_token().ok_or_else(|| self.not_authorized())
    }

    fn not_authorized(&self) -> Error {
        Error::Device(DeviceError::NotAuthorized {
            hardware_addr: self.hardware_addr.to_string(),
        })
    }

    // ========== State ==========

    /// Fetches the device's full state document.
    ///
    /// The raw JSON is cached and remains available via
    /// [`last_known_state`](Self::last_known_state) after the device goes
    /// offline. Provisions a token first if none is held.
    ///
    /// # Errors
    ///
    /// Returns error if authorization or the request fails.
    pub async fn get_state(&self) -> Result<serde_json::Value, Error> {
        let token = self.ensure_authorized().await?;
        let url = format!("{}/api/v1/{}", self.endpoint(), token);

        let response = self.transport.get(&url).await.map_err(Error::Protocol)?;
        let state: serde_json::Value = response.parse().map_err(Error::Parse)?;

        self.shared.write().last_known_state = Some(state.clone());
        Ok(state)
    }

    /// Fetches the state document parsed into [`DeviceInfo`].
    ///
    /// # Errors
    ///
    /// Returns error if authorization, the request, or parsing fails.
    pub async fn get_info(&self) -> Result<DeviceInfo, Error> {
        let state = self.get_state().await?;
        serde_json::from_value(state)
            .map_err(ParseError::Json)
            .map_err(Error::Parse)
    }

    /// Returns the most recently fetched state document, if any.
    #[must_use]
    pub fn last_known_state(&self) -> Option<serde_json::Value> {
        self.shared.read().last_known_state.clone()
    }

    // ========== Commands ==========

    /// Applies a set of state changes without waiting for the device.
    ///
    /// The options are composed into one update per field and each is sent
    /// as its own request in a background task. Failures are logged, not
    /// returned; use [`set_confirmed`](Self::set_confirmed) when per-field
    /// results matter.
    ///
    /// # Errors
    ///
    /// Returns error only if authorization fails; the updates themselves
    /// are fire-and-forget.
    pub async fn set(&self, options: &SetOptions) -> Result<(), Error> {
        let updates = options.compose(self.allow_color_brightness());
        if updates.is_empty() {
            return Ok(());
        }

        let token = self.ensure_authorized().await?;
        let url = format!("{}/api/v1/{}/state", self.endpoint(), token);

        for update in updates {
            let transport = Arc::clone(&self.transport);
            let url = url.clone();
            let hardware_addr = self.hardware_addr.clone();
            tokio::spawn(async move {
                let body = update.to_body();
                if let Err(error) = transport.put(&url, Some(body)).await {
                    tracing::warn!(
                        hardware_addr = %hardware_addr,
                        field = %update.field(),
                        error = %error,
                        "State update failed"
                    );
                }
            });
        }

        Ok(())
    }

    /// Applies a set of state changes and reports per-field outcomes.
    ///
    /// Updates are sent sequentially in composition order; a failed field
    /// does not stop the remaining ones.
    ///
    /// # Errors
    ///
    /// Returns error if authorization fails. Per-field transport failures
    /// are reported in the returned [`FieldOutcome`]s instead.
    pub async fn set_confirmed(&self, options: &SetOptions) -> Result<Vec<FieldOutcome>, Error> {
        let updates = options.compose(self.allow_color_brightness());
        if updates.is_empty() {
            return Ok(Vec::new());
        }

        let token = self.ensure_authorized().await?;
        let url = format!("{}/api/v1/{}/state", self.endpoint(), token);

        let mut outcomes = Vec::with_capacity(updates.len());
        for update in updates {
            let result = self
                .transport
                .put(&url, Some(update.to_body()))
                .await
                .map(|_| ());
            if let Err(error) = &result {
                tracing::warn!(
                    hardware_addr = %self.hardware_addr,
                    field = %update.field(),
                    error = %error,
                    "State update failed"
                );
            }
            outcomes.push(FieldOutcome {
                field: update.field(),
                result,
            });
        }

        Ok(outcomes)
    }

    /// Turns the panels on.
    ///
    /// # Errors
    ///
    /// Returns error if authorization fails.
    pub async fn power_on(&self) -> Result<(), Error> {
        self.set_power(true).await
    }

    /// Turns the panels off.
    ///
    /// # Errors
    ///
    /// Returns error if authorization fails.
    pub async fn power_off(&self) -> Result<(), Error> {
        self.set_power(false).await
    }

    /// Sets the power state.
    ///
    /// # Errors
    ///
    /// Returns error if authorization fails.
    pub async fn set_power(&self, on: bool) -> Result<(), Error> {
        self.set(&SetOptions::new().with_power(on)).await
    }

    /// Sets the brightness.
    ///
    /// # Errors
    ///
    /// Returns error if authorization fails.
    pub async fn set_brightness(&self, brightness: Brightness) -> Result<(), Error> {
        self.set(&SetOptions::new().with_brightness(brightness)).await
    }

    /// Sets the hue.
    ///
    /// # Errors
    ///
    /// Returns error if authorization fails.
    pub async fn set_hue(&self, hue: Hue) -> Result<(), Error> {
        self.set(&SetOptions::new().with_hue(hue)).await
    }

    /// Sets the color saturation.
    ///
    /// # Errors
    ///
    /// Returns error if authorization fails.
    pub async fn set_saturation(&self, saturation: Saturation) -> Result<(), Error> {
        self.set(&SetOptions::new().with_saturation(saturation)).await
    }

    /// Sets the white color temperature.
    ///
    /// # Errors
    ///
    /// Returns error if authorization fails.
    pub async fn set_color_temp(&self, color_temp: ColorTemp) -> Result<(), Error> {
        self.set(&SetOptions::new().with_color_temp(color_temp)).await
    }

    /// Sets an RGB color, converted to hue, saturation and brightness.
    ///
    /// Whether the color's derived brightness is applied is controlled by
    /// [`set_allow_color_brightness`](Self::set_allow_color_brightness).
    ///
    /// # Errors
    ///
    /// Returns error if authorization fails.
    pub async fn set_color(&self, color: RgbColor) -> Result<(), Error> {
        self.set(&SetOptions::new().with_color(color)).await
    }

    /// Flashes the panels to identify the device.
    ///
    /// # Errors
    ///
    /// Returns error if authorization or the request fails.
    pub async fn identify(&self) -> Result<(), Error> {
        let token = self.ensure_authorized().await?;
        let url = format!("{}/api/v1/{}/identify", self.endpoint(), token);
        self.transport.put(&url, None).await.map_err(Error::Protocol)?;
        Ok(())
    }

    // ========== Options ==========

    /// Returns whether RGB colors also drive brightness.
    #[must_use]
    pub fn allow_color_brightness(&self) -> bool {
        self.shared.read().allow_color_brightness
    }

    /// Controls whether RGB colors also drive brightness.
    ///
    /// When disabled (default is enabled), [`set_color`](Self::set_color)
    /// only changes hue and saturation and the current brightness is kept.
    pub fn set_allow_color_brightness(&self, allow: bool) {
        self.shared.write().allow_color_brightness = allow;
    }

    // ========== Events ==========

    /// Subscribes to this device's events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.events.subscribe()
    }
}

impl<T: Transport> Clone for Device<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            hardware_addr: self.hardware_addr.clone(),
            shared: Arc::clone(&self.shared),
            provision_lock: Arc::clone(&self.provision_lock),
            events: self.events.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::protocol::ApiResponse;

    #[derive(Debug)]
    struct NullTransport;

    #[async_trait]
    impl Transport for NullTransport {
        async fn get(&self, _url: &str) -> Result<ApiResponse, ProtocolError> {
            Ok(ApiResponse::new(String::new()))
        }

        async fn post(&self, _url: &str) -> Result<ApiResponse, ProtocolError> {
            Ok(ApiResponse::new(String::new()))
        }

        async fn put(
            &self,
            _url: &str,
            _body: Option<serde_json::Value>,
        ) -> Result<ApiResponse, ProtocolError> {
            Ok(ApiResponse::new(String::new()))
        }

        async fn delete(&self, _url: &str) -> Result<ApiResponse, ProtocolError> {
            Ok(ApiResponse::new(String::new()))
        }
    }

    fn device() -> Device<NullTransport> {
        Device::new(
            Arc::new(NullTransport),
            HardwareAddr::new("13:F6:11:72:E2:38"),
            "Bedroom Panels",
            "http://192.168.4.159:16021",
        )
    }

    #[test]
    fn new_device_starts_unauthorized() {
        let device = device();

        assert_eq!(device.name(), "Bedroom Panels");
        assert_eq!(device.endpoint(), "http://192.168.4.159:16021");
        assert_eq!(device.auth_state(), AuthState::Unauthorized);
        assert!(!device.is_authorized());
        assert!(device.auth_token().is_none());
        assert!(device.allow_color_brightness());
        assert!(device.last_known_state().is_none());
    }

    #[test]
    fn set_auth_token_authorizes_and_publishes() {
        let device = device();
        let mut events = device.subscribe();

        device.set_auth_token("secret-token");

        assert_eq!(device.auth_token().as_deref(), Some("secret-token"));
        assert_eq!(device.auth_state(), AuthState::Authorized);

        let event = events.try_recv().unwrap();
        assert!(matches!(event, DeviceEvent::AuthTokenGenerated { .. }));
    }

    #[test]
    fn clones_share_state() {
        let device = device();
        let clone = device.clone();

        clone.set_auth_token("secret-token");
        clone.set_allow_color_brightness(false);

        assert_eq!(device.auth_token().as_deref(), Some("secret-token"));
        assert!(!device.allow_color_brightness());
    }

    #[test]
    fn display_name_and_endpoint_can_be_updated() {
        let device = device();

        device.set_display_name("Office Panels");
        device.set_endpoint("http://192.168.4.201:16021");

        assert_eq!(device.name(), "Office Panels");
        assert_eq!(device.endpoint(), "http://192.168.4.201:16021");
    }
}
