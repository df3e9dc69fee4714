// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background polling of a panel.
//!
//! A [`Monitor`] drives a [`StateReconciler`] from a Tokio task: it runs a
//! cycle, waits the poll interval, and repeats. The next cycle is armed
//! only after the current one has finished, so polls never overlap and
//! slow responses simply stretch the period.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use alarmpanel_lib::monitor::{Monitor, MonitorConfig};
//! use alarmpanel_lib::protocol::PanelConfig;
//! use alarmpanel_lib::subscription::Subscribable;
//! use alarmpanel_lib::types::Pin;
//!
//! # async fn example() -> alarmpanel_lib::Result<()> {
//! let client = PanelConfig::new("192.168.1.20", "user", Pin::new("1234")?).into_client()?;
//!
//! let handle = Monitor::from_config(Arc::new(client), &MonitorConfig::default()).spawn();
//! handle.on_area_mode_changed(|area, mode| println!("area {area}: {mode}"));
//! handle.on_fault_changed(|faulted| println!("fault: {faulted}"));
//!
//! // ...
//! handle.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod config;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub use config::{DEFAULT_POLL_INTERVAL, DEFAULT_PULSE_DURATION, MonitorConfig};

use crate::protocol::PanelApi;
use crate::reconciler::{PollOutcome, StateReconciler};
use crate::subscription::{CallbackRegistry, Subscribable};

/// A reconciler paired with its poll interval, ready to be spawned.
#[derive(Debug)]
pub struct Monitor<P> {
    reconciler: StateReconciler<P>,
    interval: Duration,
}

impl<P: PanelApi + 'static> Monitor<P> {
    /// Creates a monitor polling `reconciler` every `interval`.
    #[must_use]
    pub fn new(reconciler: StateReconciler<P>, interval: Duration) -> Self {
        Self {
            reconciler,
            interval,
        }
    }

    /// Creates a reconciler for `panel` and a monitor using the configured
    /// poll interval.
    #[must_use]
    pub fn from_config(panel: Arc<P>, config: &MonitorConfig) -> Self {
        Self::new(StateReconciler::new(panel, config), config.poll_interval)
    }

    /// Returns the reconciler, for subscribing before the first poll.
    #[must_use]
    pub fn reconciler(&self) -> &StateReconciler<P> {
        &self.reconciler
    }

    /// Starts polling on a new Tokio task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use = "dropping the handle stops the monitor"]
    pub fn spawn(self) -> MonitorHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (outcome_tx, outcome_rx) = watch::channel(None);
        let cycles = Arc::new(AtomicU64::new(0));
        let callbacks = Arc::clone(self.reconciler.callback_registry());

        let task = tokio::spawn(run(
            self.reconciler,
            self.interval,
            shutdown_rx,
            outcome_tx,
            Arc::clone(&cycles),
        ));

        MonitorHandle {
            shutdown: shutdown_tx,
            task,
            callbacks,
            outcomes: outcome_rx,
            cycles,
        }
    }
}

async fn run<P: PanelApi>(
    mut reconciler: StateReconciler<P>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
    outcomes: watch::Sender<Option<PollOutcome>>,
    cycles: Arc<AtomicU64>,
) {
    tracing::debug!(?interval, "panel monitor started");

    while !*shutdown.borrow() {
        let outcome = reconciler.poll_once().await;
        cycles.fetch_add(1, Ordering::Relaxed);
        outcomes.send_replace(Some(outcome));

        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            // Fires on shutdown and when the handle is dropped
            _ = shutdown.changed() => break,
        }
    }

    tracing::debug!("panel monitor stopped");
}

/// Handle to a running [`Monitor`].
///
/// Dropping the handle stops the poll loop once the current cycle ends.
#[derive(Debug)]
pub struct MonitorHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
    callbacks: Arc<CallbackRegistry>,
    outcomes: watch::Receiver<Option<PollOutcome>>,
    cycles: Arc<AtomicU64>,
}

impl MonitorHandle {
    /// Returns the number of completed poll cycles.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Returns the outcome of the most recent cycle.
    #[must_use]
    pub fn last_outcome(&self) -> Option<PollOutcome> {
        self.outcomes.borrow().clone()
    }

    /// Returns a receiver notified after every cycle.
    #[must_use]
    pub fn outcomes(&self) -> watch::Receiver<Option<PollOutcome>> {
        self.outcomes.clone()
    }

    /// Returns `true` while the poll loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops the poll loop and waits for it to finish.
    ///
    /// A cycle in progress is allowed to complete.
    pub async fn shutdown(self) {
        self.shutdown.send_replace(true);
        if let Err(err) = self.task.await {
            tracing::warn!(error = %err, "panel monitor task failed");
        }
    }
}

impl Subscribable for MonitorHandle {
    fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }
}
