// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for alarm panel monitoring.
//!
//! Each type ensures values are within their valid ranges at construction
//! time, preventing malformed requests from reaching the panel.
//!
//! # Types
//!
//! - [`AreaMode`] - Arming mode of one area (Disarmed/Stay/Away)
//! - [`Pin`] - Numeric user PIN sent at login
//! - [`ZoneNumber`] - 1-based zone address
//! - [`ZoneConfig`] - Zone number, bank and bit polarity of a monitored zone

mod area_mode;
mod pin;
mod zone;

pub use area_mode::AreaMode;
pub use pin::Pin;
pub use zone::{ZoneConfig, ZoneNumber};
