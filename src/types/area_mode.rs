// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arming mode of a panel area.

use std::fmt;

/// Arming mode of one area, as decoded from the status blob.
///
/// [`AreaMode::Unknown`] is only ever observed before the first successful
/// decode; the decoder itself always yields one of the three other modes.
///
/// # Examples
///
/// ```
/// use alarmpanel_lib::types::AreaMode;
///
/// assert!(AreaMode::Away.is_armed());
/// assert!(!AreaMode::Disarmed.is_armed());
/// assert_eq!(AreaMode::default(), AreaMode::Unknown);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AreaMode {
    /// The area is disarmed (includes a running exit delay).
    Disarmed,
    /// Partially armed, perimeter only.
    Stay,
    /// Fully armed.
    Away,
    /// Not yet observed.
    #[default]
    Unknown,
}

impl AreaMode {
    /// Returns the lowercase name of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Disarmed => "disarmed",
            Self::Stay => "stay",
            Self::Away => "away",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` for [`AreaMode::Stay`] and [`AreaMode::Away`].
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        matches!(self, Self::Stay | Self::Away)
    }

    /// Returns `true` once the mode has been decoded at least once.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for AreaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
