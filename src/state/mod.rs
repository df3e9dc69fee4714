// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observed panel state and the changes between observations.
//!
//! [`PanelSnapshot`] holds the last observed value of every monitored
//! field. Updating a field returns a [`StateChange`] only when the value
//! actually differs, which is what makes repeated polls idempotent.
//!
//! # Examples
//!
//! ```
//! use alarmpanel_lib::state::{PanelSnapshot, StateChange};
//! use alarmpanel_lib::types::AreaMode;
//!
//! let mut snapshot = PanelSnapshot::new();
//!
//! // The first observation is always a change
//! let change = snapshot.update_area_mode(0, AreaMode::Away);
//! assert!(matches!(change, Some(StateChange::AreaMode { old: AreaMode::Unknown, .. })));
//!
//! // Observing the same value again is not
//! assert!(snapshot.update_area_mode(0, AreaMode::Away).is_none());
//! ```

mod snapshot;
mod state_change;

pub use snapshot::PanelSnapshot;
pub use state_change::{ALARM_PULSE, DOOR_PULSE, StateChange};
