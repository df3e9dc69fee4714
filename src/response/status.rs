// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Area status response.

use serde_json::Value;

use crate::decoder;
use crate::error::{Error, Result};
use crate::types::{AreaMode, ZoneConfig};

/// Status of one area as reported by the status endpoint.
///
/// Only the `bankstates` blob is kept; decoding happens on demand.
///
/// # Examples
///
/// ```
/// use alarmpanel_lib::response::Status;
/// use alarmpanel_lib::types::AreaMode;
///
/// let payload = serde_json::json!({"bankstates": "00000000400100000000"});
/// let status = Status::from_payload(0, &payload).unwrap();
/// assert_eq!(status.area_mode(), AreaMode::Away);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    area_index: u8,
    bankstates: String,
}

impl Status {
    /// Creates a status from a raw blob.
    #[must_use]
    pub fn new(area_index: u8, bankstates: impl Into<String>) -> Self {
        Self {
            area_index,
            bankstates: bankstates.into(),
        }
    }

    /// Extracts the status from the endpoint's JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if `bankstates` is absent or not a
    /// string.
    pub fn from_payload(area_index: u8, payload: &Value) -> Result<Self> {
        payload
            .get("bankstates")
            .and_then(Value::as_str)
            .map(|blob| Self::new(area_index, blob))
            .ok_or(Error::MissingField("bankstates"))
    }

    /// Returns the area this status was fetched for.
    #[must_use]
    pub fn area_index(&self) -> u8 {
        self.area_index
    }

    /// Returns the raw hex blob.
    #[must_use]
    pub fn bankstates(&self) -> &str {
        &self.bankstates
    }

    /// Decodes the arming mode of the fetched area.
    #[must_use]
    pub fn area_mode(&self) -> AreaMode {
        decoder::decode_area_mode(&self.bankstates, self.area_index)
    }

    /// Decodes the open state of a configured zone.
    #[must_use]
    pub fn is_zone_open(&self, zone: &ZoneConfig) -> bool {
        decoder::is_zone_open(&self.bankstates, zone.number, zone.bank, zone.open_when_set)
    }
}
