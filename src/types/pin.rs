// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User PIN type.
//!
//! PINs are kept as strings so leading zeros survive. The value never
//! appears in `Debug` output.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// A numeric user PIN.
///
/// # Examples
///
/// ```
/// use alarmpanel_lib::types::Pin;
///
/// let pin = Pin::new("0042").unwrap();
/// assert_eq!(pin.as_str(), "0042");
/// assert_eq!(format!("{pin:?}"), "Pin(****)");
///
/// assert!(Pin::new("12a4").is_err());
/// assert!(Pin::new("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(String);

impl Pin {
    /// Creates a PIN from a string of ASCII digits.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidPin` if the string is empty or contains
    /// anything other than digits.
    pub fn new(pin: impl Into<String>) -> Result<Self, ValueError> {
        let pin = pin.into();
        if pin.is_empty() || !pin.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValueError::InvalidPin);
        }
        Ok(Self(pin))
    }

    /// Returns the PIN digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

impl FromStr for Pin {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<u32> for Pin {
    type Error = ValueError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}
