// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.

use std::fmt;

use crate::types::{AreaMode, ZoneNumber};

/// Pulse key fired when the area's arming mode changes.
pub const ALARM_PULSE: &str = "alarm";

/// Pulse key fired when the door zone opens or closes.
pub const DOOR_PULSE: &str = "door";

/// A change of one monitored field, with its previous and new value.
///
/// # Examples
///
/// ```
/// use alarmpanel_lib::state::StateChange;
/// use alarmpanel_lib::types::AreaMode;
///
/// let change = StateChange::AreaMode { area: 0, old: AreaMode::Away, new: AreaMode::Stay };
/// assert_eq!(change.field(), "area_mode");
/// assert_eq!(change.pulse_key(), "alarm");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// The arming mode of an area changed.
    AreaMode {
        /// The area index.
        area: u8,
        /// The previous mode ([`AreaMode::Unknown`] on the first poll).
        old: AreaMode,
        /// The new mode.
        new: AreaMode,
    },

    /// A zone opened or closed.
    Zone {
        /// The zone number.
        zone: ZoneNumber,
        /// The previous open state (`None` on the first poll).
        old: Option<bool>,
        /// Whether the zone is now open.
        new: bool,
    },
}

impl StateChange {
    /// Returns the name of the changed field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::AreaMode { .. } => "area_mode",
            Self::Zone { .. } => "zone",
        }
    }

    /// Returns the pulse key to fire for this change.
    #[must_use]
    pub const fn pulse_key(&self) -> &'static str {
        match self {
            Self::AreaMode { .. } => ALARM_PULSE,
            Self::Zone { .. } => DOOR_PULSE,
        }
    }

    /// Returns `true` if this is an arming mode change.
    #[must_use]
    pub const fn is_area_mode(&self) -> bool {
        matches!(self, Self::AreaMode { .. })
    }

    /// Returns `true` if this is a zone change.
    #[must_use]
    pub const fn is_zone(&self) -> bool {
        matches!(self, Self::Zone { .. })
    }

    /// Returns `true` if the field had never been observed before.
    #[must_use]
    pub const fn is_initial(&self) -> bool {
        match self {
            Self::AreaMode { old, .. } => !old.is_known(),
            Self::Zone { old, .. } => old.is_none(),
        }
    }
}

fn open_str(open: bool) -> &'static str {
    if open { "open" } else { "closed" }
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AreaMode { area, old, new } => write!(f, "area {area}: {old} -> {new}"),
            Self::Zone { zone, old, new } => match old {
                Some(old) => write!(f, "{zone}: {} -> {}", open_str(*old), open_str(*new)),
                None => write!(f, "{zone}: {}", open_str(*new)),
            },
        }
    }
}
