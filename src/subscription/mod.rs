// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for panel events.
//!
//! Three kinds of events are published:
//!
//! - **State changes**: level state of the arming mode and the door zone,
//!   as `(field, old, new)` through [`StateChange`](crate::state::StateChange)
//! - **Pulses**: a momentary `true` followed by `false` after the pulse
//!   duration, keyed `"alarm"` or `"door"`
//! - **Faults**: `true` after each failed poll, `false` once a poll succeeds
//!   again
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription
//! - [`CallbackRegistry`] - Registry that stores callbacks and dispatches events
//! - [`Subscribable`] - Trait for publishers backed by a registry

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
