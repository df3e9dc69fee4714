// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last observed panel state.

use crate::types::{AreaMode, ZoneNumber};

use super::StateChange;

/// Last observed arming mode and door zone state.
///
/// All fields start unobserved, so the first update of each field always
/// yields a change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelSnapshot {
    area_mode: AreaMode,
    zone_open: Option<bool>,
}

impl PanelSnapshot {
    /// Creates a snapshot with nothing observed yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last observed arming mode.
    #[must_use]
    pub fn area_mode(&self) -> AreaMode {
        self.area_mode
    }

    /// Returns the last observed zone state.
    #[must_use]
    pub fn zone_open(&self) -> Option<bool> {
        self.zone_open
    }

    /// Records the arming mode, returning the change if it differs.
    pub fn update_area_mode(&mut self, area: u8, mode: AreaMode) -> Option<StateChange> {
        if self.area_mode == mode {
            return None;
        }
        let old = std::mem::replace(&mut self.area_mode, mode);
        Some(StateChange::AreaMode {
            area,
            old,
            new: mode,
        })
    }

    /// Records the zone state, returning the change if it differs.
    pub fn update_zone(&mut self, zone: ZoneNumber, open: bool) -> Option<StateChange> {
        if self.zone_open == Some(open) {
            return None;
        }
        let old = self.zone_open.replace(open);
        Some(StateChange::Zone {
            zone,
            old,
            new: open,
        })
    }
}
