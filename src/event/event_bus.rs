// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast bus carrying discovery and authorization events.

use tokio::sync::broadcast;

use super::DeviceEvent;

/// Events buffered per subscriber before the oldest are overwritten.
const EVENT_BUFFER: usize = 256;

/// Fan-out channel shared by a discovery loop and its devices.
///
/// [`Discovery`](crate::Discovery) creates one bus and hands a clone to
/// every device it registers, so a single subscription observes lifecycle
/// and authorization events for the whole fleet. Cloning the bus shares
/// the underlying channel rather than creating a new one.
///
/// Delivery is best effort. A subscriber that stops polling loses the
/// oldest events once its buffer fills up and sees
/// [`Lagged`](broadcast::error::RecvError::Lagged) on its next receive.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DeviceEvent>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER);
        Self { sender }
    }

    /// Opens a subscription that sees every event published from now on.
    ///
    /// Events published before this call are not replayed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.sender.subscribe()
    }

    /// Number of currently open subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Delivers an event to all subscribers.
    ///
    /// With nobody subscribed the event is dropped. Publishing never
    /// fails, so callers fire events without checking for listeners.
    pub fn publish(&self, event: DeviceEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
