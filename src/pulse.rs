// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Momentary notifications that reset themselves after a fixed duration.
//!
//! [`PulseNotifier::pulse`] reports a key as active right away and spawns
//! a timer task that reports it inactive once the duration has passed.
//! Pulsing a key again while it is active replaces the pending timer, so
//! the key stays active and resets once, measured from the last pulse.
//! Keys are independent of each other.
//!
//! Activation and reset are delivered through
//! [`CallbackRegistry::dispatch_pulse`] after the timer table is updated
//! and unlocked, so a pulse callback may query the notifier. Transitions
//! are dispatched one at a time in the order they happen; a pulse callback
//! must therefore not pulse again.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::subscription::CallbackRegistry;

/// Pending reset of one key.
#[derive(Debug)]
struct PulseTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Debug)]
struct Inner {
    duration: Duration,
    callbacks: Arc<CallbackRegistry>,
    timers: Mutex<HashMap<String, PulseTimer>>,
    /// Held from a transition until its callbacks have run.
    transitions: Mutex<()>,
    next_generation: AtomicU64,
}

impl Inner {
    fn reset(&self, key: &str, generation: u64) {
        let _transition = self.transitions.lock();
        {
            let mut timers = self.timers.lock();
            // A newer pulse owns the entry now
            if timers.get(key).is_none_or(|t| t.generation != generation) {
                return;
            }
            timers.remove(key);
        }
        tracing::debug!(key, "pulse reset");
        self.callbacks.dispatch_pulse(key, false);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        for timer in self.timers.get_mut().values() {
            timer.handle.abort();
        }
    }
}

/// Registry of self-resetting pulse timers, one per key.
///
/// Pending timers are aborted when the last clone is dropped; their reset
/// is then never reported.
#[derive(Debug, Clone)]
pub struct PulseNotifier {
    inner: Arc<Inner>,
}

impl PulseNotifier {
    /// Creates a notifier dispatching to `callbacks`.
    #[must_use]
    pub fn new(duration: Duration, callbacks: Arc<CallbackRegistry>) -> Self {
        Self {
            inner: Arc::new(Inner {
                duration,
                callbacks,
                timers: Mutex::new(HashMap::new()),
                transitions: Mutex::new(()),
                next_generation: AtomicU64::new(1),
            }),
        }
    }

    /// Returns the time a pulse stays active.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.inner.duration
    }

    /// Activates `key` and schedules its reset.
    ///
    /// Activation is reported only when the key was inactive; re-pulsing
    /// an active key just pushes its reset back.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn pulse(&self, key: &str) {
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let _transition = self.inner.transitions.lock();

        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        let duration = self.inner.duration;
        let task_key = key.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(inner) = inner.upgrade() {
                inner.reset(&task_key, generation);
            }
        });

        let previous = self
            .inner
            .timers
            .lock()
            .insert(key.to_string(), PulseTimer { generation, handle });

        match previous {
            Some(previous) => {
                previous.handle.abort();
                tracing::debug!(key, "pulse extended");
            }
            None => {
                tracing::debug!(key, "pulse active");
                self.inner.callbacks.dispatch_pulse(key, true);
            }
        }
    }

    /// Returns `true` if `key` is active.
    #[must_use]
    pub fn is_active(&self, key: &str) -> bool {
        self.inner.timers.lock().contains_key(key)
    }

    /// Returns the number of active keys.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.inner.timers.lock().len()
    }
}
