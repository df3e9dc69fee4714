// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for panel state subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::StateChange;
use crate::types::{AreaMode, ZoneNumber};

/// Unique identifier for a subscription.
///
/// Returned when registering a callback and used to unsubscribe later. IDs
/// are unique within a registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

type AreaModeCallback = Arc<dyn Fn(u8, AreaMode) + Send + Sync>;

type ZoneCallback = Arc<dyn Fn(ZoneNumber, bool) + Send + Sync>;

/// Receives the pulse key and whether the pulse is now active.
type PulseCallback = Arc<dyn Fn(&str, bool) + Send + Sync>;

/// Receives `true` when a poll fails and `false` once polling recovers.
type FaultCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Registry for panel subscription callbacks.
///
/// Uses `parking_lot::RwLock` for interior mutability, so it can be shared
/// between the poll loop, pulse timers and subscribers through an `Arc`.
///
/// Callbacks run synchronously on the dispatching task and must not
/// block. A callback must not register or remove callbacks on the same
/// registry.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
    area_mode_callbacks: RwLock<HashMap<SubscriptionId, AreaModeCallback>>,
    zone_callbacks: RwLock<HashMap<SubscriptionId, ZoneCallback>>,
    pulse_callbacks: RwLock<HashMap<SubscriptionId, PulseCallback>>,
    fault_callbacks: RwLock<HashMap<SubscriptionId, FaultCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            state_changed_callbacks: RwLock::new(HashMap::new()),
            area_mode_callbacks: RwLock::new(HashMap::new()),
            zone_callbacks: RwLock::new(HashMap::new()),
            pulse_callbacks: RwLock::new(HashMap::new()),
            fault_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for all state changes.
    ///
    /// The callback receives the changed field with its old and new value.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for arming mode changes.
    ///
    /// The callback receives the area index and the new mode.
    pub fn on_area_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u8, AreaMode) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.area_mode_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for zone open/closed changes.
    pub fn on_zone_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ZoneNumber, bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.zone_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for pulse activation and reset.
    ///
    /// The callback receives the pulse key (`"alarm"`, `"door"`) and `true`
    /// when the pulse starts, `false` when it resets.
    pub fn on_pulse<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str, bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.pulse_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for the fault indicator.
    pub fn on_fault_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.fault_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state_changed_callbacks.write().remove(&id).is_some()
            || self.area_mode_callbacks.write().remove(&id).is_some()
            || self.zone_callbacks.write().remove(&id).is_some()
            || self.pulse_callbacks.write().remove(&id).is_some()
            || self.fault_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.state_changed_callbacks.write().clear();
        self.area_mode_callbacks.write().clear();
        self.zone_callbacks.write().clear();
        self.pulse_callbacks.write().clear();
        self.fault_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches a state change to the generic and the matching typed
    /// callbacks. Callbacks are called in an arbitrary order.
    pub fn dispatch(&self, change: &StateChange) {
        {
            let callbacks = self.state_changed_callbacks.read();
            for callback in callbacks.values() {
                callback(change);
            }
        }

        match change {
            StateChange::AreaMode { area, new, .. } => {
                let callbacks = self.area_mode_callbacks.read();
                for callback in callbacks.values() {
                    callback(*area, *new);
                }
            }
            StateChange::Zone { zone, new, .. } => {
                let callbacks = self.zone_callbacks.read();
                for callback in callbacks.values() {
                    callback(*zone, *new);
                }
            }
        }
    }

    /// Dispatches a pulse activation (`true`) or reset (`false`).
    pub fn dispatch_pulse(&self, key: &str, active: bool) {
        let callbacks = self.pulse_callbacks.read();
        for callback in callbacks.values() {
            callback(key, active);
        }
    }

    /// Dispatches the fault indicator.
    pub fn dispatch_fault(&self, faulted: bool) {
        let callbacks = self.fault_callbacks.read();
        for callback in callbacks.values() {
            callback(faulted);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.state_changed_callbacks.read().len()
            + self.area_mode_callbacks.read().len()
            + self.zone_callbacks.read().len()
            + self.pulse_callbacks.read().len()
            + self.fault_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
