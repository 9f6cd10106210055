// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sighting throttle for the discovery loop.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use std::time::Duration;

use tokio::time::Instant;

/// A set whose entries expire after a fixed time-to-live.
///
/// Devices answer every search and some answer several times per search, so
/// the discovery loop records each sighting here and ignores repeats inside
/// the window.
#[derive(Debug)]
pub(crate) struct ExpiringSet<K> {
    ttl: Duration,
    entries: HashMap<K, Instant>,
}

impl<K: Eq + Hash> ExpiringSet<K> {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Records a sighting at `now`.
    ///
    /// Returns `true` if the key was absent or its previous sighting has
    /// expired. A suppressed sighting does not refresh the entry, so the
    /// window is fixed rather than sliding.
    pub(crate) fn try_insert(&mut self, key: K, now: Instant) -> bool {
        self.entries
            .retain(|_, seen| now.duration_since(*seen) < self.ttl);

        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn repeat_sighting_within_window_is_suppressed() {
        let mut set = ExpiringSet::new(Duration::from_secs(5));
        let start = Instant::now();

        assert!(set.try_insert("a", start));
        assert!(!set.try_insert("a", start + Duration::from_secs(3)));
    }

    #[tokio::test(start_paused = true)]
    async fn sighting_after_window_is_allowed() {
        let mut set = ExpiringSet::new(Duration::from_secs(5));
        let start = Instant::now();

        assert!(set.try_insert("a", start));
        assert!(set.try_insert("a", start + Duration::from_secs(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn suppressed_sighting_does_not_extend_window() {
        let mut set = ExpiringSet::new(Duration::from_secs(5));
        let start = Instant::now();

        assert!(set.try_insert("a", start));
        assert!(!set.try_insert("a", start + Duration::from_secs(4)));
        // Window is measured from the first sighting, not the suppressed one
        assert!(set.try_insert("a", start + Duration::from_secs(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn keys_are_independent() {
        let mut set = ExpiringSet::new(Duration::from_secs(5));
        let start = Instant::now();

        assert!(set.try_insert("a", start));
        assert!(set.try_insert("b", start));
        assert!(!set.try_insert("a", start + Duration::from_secs(1)));
    }
}
