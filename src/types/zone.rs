// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zone addressing.

use std::fmt;

use crate::error::ValueError;

/// A 1-based zone number, as printed on the panel's zone list.
///
/// # Examples
///
/// ```
/// use alarmpanel_lib::types::ZoneNumber;
///
/// let zone = ZoneNumber::new(9).unwrap();
/// assert_eq!(zone.index(), 8);
/// assert!(ZoneNumber::new(0).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct ZoneNumber(u8);

impl ZoneNumber {
    /// Creates a zone number.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` for zone 0.
    pub fn new(number: u8) -> Result<Self, ValueError> {
        if number == 0 {
            return Err(ValueError::OutOfRange {
                min: 1,
                max: u16::from(u8::MAX),
                actual: 0,
            });
        }
        Ok(Self(number))
    }

    /// Returns the 1-based zone number.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns the 0-based bit index of the zone.
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.0 - 1
    }
}

impl fmt::Display for ZoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone {}", self.0)
    }
}

impl TryFrom<u8> for ZoneNumber {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ZoneNumber> for u8 {
    fn from(zone: ZoneNumber) -> Self {
        zone.0
    }
}

/// Where to find one zone in the status blob, and how to read its bit.
///
/// # Examples
///
/// ```
/// use alarmpanel_lib::types::{ZoneConfig, ZoneNumber};
///
/// let door = ZoneConfig::new(ZoneNumber::new(3).unwrap()).with_open_when_set(false);
/// assert_eq!(door.bank, 0);
/// assert!(!door.open_when_set);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ZoneConfig {
    /// The 1-based zone number.
    pub number: ZoneNumber,
    /// Zone bank selector. Accepted for panels with another zone layout,
    /// it does not shift the byte offset.
    #[serde(default)]
    pub bank: u8,
    /// Whether a set bit means the zone is open.
    #[serde(default = "default_open_when_set")]
    pub open_when_set: bool,
}

const fn default_open_when_set() -> bool {
    true
}

impl ZoneConfig {
    /// Creates a configuration for `number` in bank 0, open when set.
    #[must_use]
    pub const fn new(number: ZoneNumber) -> Self {
        Self {
            number,
            bank: 0,
            open_when_set: true,
        }
    }

    /// Sets the bank selector.
    #[must_use]
    pub const fn with_bank(mut self, bank: u8) -> Self {
        self.bank = bank;
        self
    }

    /// Sets the bit polarity.
    #[must_use]
    pub const fn with_open_when_set(mut self, open_when_set: bool) -> Self {
        self.open_when_set = open_when_set;
        self
    }
}
