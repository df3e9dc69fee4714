// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that publish panel events.

use crate::state::StateChange;
use crate::subscription::{CallbackRegistry, SubscriptionId};
use crate::types::{AreaMode, ZoneNumber};

/// Trait for types that support event subscriptions.
///
/// Implementors only provide [`callbacks`](Self::callbacks); every
/// subscription method forwards to that registry.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use alarmpanel_lib::monitor::MonitorConfig;
/// use alarmpanel_lib::protocol::PanelConfig;
/// use alarmpanel_lib::reconciler::StateReconciler;
/// use alarmpanel_lib::subscription::Subscribable;
/// use alarmpanel_lib::types::Pin;
///
/// # fn example() -> alarmpanel_lib::Result<()> {
/// let client = PanelConfig::new("192.168.1.20", "user", Pin::new("1234")?).into_client()?;
/// let reconciler = StateReconciler::new(Arc::new(client), &MonitorConfig::default());
///
/// let sub_id = reconciler.on_area_mode_changed(|area, mode| {
///     println!("area {area} is now {mode}");
/// });
/// reconciler.on_pulse(|key, active| println!("{key}: {active}"));
///
/// reconciler.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Returns the registry holding this publisher's callbacks.
    fn callbacks(&self) -> &CallbackRegistry;

    /// Subscribes to all state changes.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.callbacks().on_state_changed(callback)
    }

    /// Subscribes to arming mode changes.
    fn on_area_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u8, AreaMode) + Send + Sync + 'static,
    {
        self.callbacks().on_area_mode_changed(callback)
    }

    /// Subscribes to door zone changes.
    fn on_zone_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ZoneNumber, bool) + Send + Sync + 'static,
    {
        self.callbacks().on_zone_changed(callback)
    }

    /// Subscribes to pulse activation and reset.
    fn on_pulse<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str, bool) + Send + Sync + 'static,
    {
        self.callbacks().on_pulse(callback)
    }

    /// Subscribes to the fault indicator.
    fn on_fault_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.callbacks().on_fault_changed(callback)
    }

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks().unsubscribe(id)
    }
}
