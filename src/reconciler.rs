// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Turns periodic status polls into change notifications.
//!
//! Each poll cycle goes `Idle -> Polling -> (Success | Failed) -> Idle`.
//! A successful cycle decodes the area's arming mode and, when configured,
//! the door zone. Each field whose value differs from the last observed
//! one updates the snapshot, is dispatched as a [`StateChange`] and fires
//! its pulse. A failed cycle leaves the snapshot untouched, drops the
//! session and raises the fault indicator.

use std::sync::Arc;

use crate::error::Error;
use crate::monitor::MonitorConfig;
use crate::protocol::PanelApi;
use crate::pulse::PulseNotifier;
use crate::response::Status;
use crate::state::{PanelSnapshot, StateChange};
use crate::subscription::{CallbackRegistry, Subscribable};
use crate::types::ZoneConfig;

/// Where the reconciler is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollPhase {
    /// Waiting for the next trigger.
    #[default]
    Idle,
    /// A status request is in flight.
    Polling,
}

/// Result of one poll cycle.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// The status was fetched and decoded.
    Success {
        /// Fields that changed, in dispatch order.
        changes: Vec<StateChange>,
    },
    /// The status could not be fetched.
    Failed(Error),
}

impl PollOutcome {
    /// Returns `true` for a successful cycle.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the changes of a successful cycle, empty on failure.
    #[must_use]
    pub fn changes(&self) -> &[StateChange] {
        match self {
            Self::Success { changes } => changes,
            Self::Failed(_) => &[],
        }
    }

    /// Returns the error of a failed cycle.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Success { .. } => None,
            Self::Failed(err) => Some(err),
        }
    }
}

/// Edge detector between the panel and its subscribers.
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
/// # async fn example() -> alarmpanel_lib::Result<()> {
/// let client = PanelConfig::new("192.168.1.20", "user", Pin::new("1234")?).into_client()?;
/// let mut reconciler = StateReconciler::new(Arc::new(client), &MonitorConfig::default());
///
/// reconciler.on_state_changed(|change| println!("{change}"));
///
/// let outcome = reconciler.poll_once().await;
/// println!("{} change(s)", outcome.changes().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct StateReconciler<P> {
    panel: Arc<P>,
    area_index: u8,
    door_zone: Option<ZoneConfig>,
    snapshot: PanelSnapshot,
    phase: PollPhase,
    faulted: bool,
    callbacks: Arc<CallbackRegistry>,
    pulses: PulseNotifier,
}

impl<P: PanelApi> StateReconciler<P> {
    /// Creates a reconciler with its own callback registry.
    #[must_use]
    pub fn new(panel: Arc<P>, config: &MonitorConfig) -> Self {
        Self::with_callbacks(panel, config, Arc::new(CallbackRegistry::new()))
    }

    /// Creates a reconciler dispatching to an existing registry.
    #[must_use]
    pub fn with_callbacks(
        panel: Arc<P>,
        config: &MonitorConfig,
        callbacks: Arc<CallbackRegistry>,
    ) -> Self {
        let pulses = PulseNotifier::new(config.pulse_duration, Arc::clone(&callbacks));
        Self {
            panel,
            area_index: config.area_index,
            door_zone: config.door_zone,
            snapshot: PanelSnapshot::new(),
            phase: PollPhase::Idle,
            faulted: false,
            callbacks,
            pulses,
        }
    }

    /// Returns the panel being polled.
    #[must_use]
    pub fn panel(&self) -> &Arc<P> {
        &self.panel
    }

    /// Returns the shared callback registry.
    #[must_use]
    pub fn callback_registry(&self) -> &Arc<CallbackRegistry> {
        &self.callbacks
    }

    /// Returns the pulse notifier.
    #[must_use]
    pub fn pulses(&self) -> &PulseNotifier {
        &self.pulses
    }

    /// Returns the current cycle phase.
    #[must_use]
    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    /// Returns `true` if the last cycle failed.
    #[must_use]
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    /// Runs one poll cycle.
    ///
    /// Errors never escape: a failed cycle is reported as
    /// [`PollOutcome::Failed`] and through the fault callbacks.
    ///
    /// Must be called from within a Tokio runtime since changes start
    /// pulse timers.
    pub async fn poll_once(&mut self) -> PollOutcome {
        self.phase = PollPhase::Polling;
        let outcome = match self.panel.status(self.area_index).await {
            Ok(status) => PollOutcome::Success {
                changes: self.reconcile(&status),
            },
            Err(err) => {
                self.fail(&err);
                PollOutcome::Failed(err)
            }
        };
        self.phase = PollPhase::Idle;
        outcome
    }

    fn reconcile(&mut self, status: &Status) -> Vec<StateChange> {
        if self.faulted {
            self.faulted = false;
            tracing::info!(area_index = self.area_index, "panel polling recovered");
            self.callbacks.dispatch_fault(false);
        }

        let mut changes = Vec::with_capacity(2);
        changes.extend(
            self.snapshot
                .update_area_mode(self.area_index, status.area_mode()),
        );
        if let Some(zone) = &self.door_zone {
            changes.extend(
                self.snapshot
                    .update_zone(zone.number, status.is_zone_open(zone)),
            );
        }

        if changes.is_empty() {
            tracing::trace!(area_index = self.area_index, "panel state unchanged");
        }
        for change in &changes {
            tracing::info!(change = %change, "panel state changed");
            self.callbacks.dispatch(change);
            self.pulses.pulse(change.pulse_key());
        }
        changes
    }

    fn fail(&mut self, err: &Error) {
        tracing::warn!(area_index = self.area_index, error = %err, "panel poll failed");
        self.panel.invalidate_session();
        self.faulted = true;
        self.callbacks.dispatch_fault(true);
    }

    #[cfg(test)]
    fn snapshot(&self) -> &PanelSnapshot {
        &self.snapshot
    }
}

impl<P> Subscribable for StateReconciler<P> {
    fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }
}
