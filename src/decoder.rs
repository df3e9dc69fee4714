// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bitfield decoding of the panel's `bankstates` status blob.
//!
//! The blob is a hex string made of 2-character bytes. Several independent
//! boolean arrays live in it at fixed byte offsets, one bit per area or
//! zone. Everything here is pure: no I/O and no state.
//!
//! # Layout
//!
//! | char offset | content                               |
//! |-------------|---------------------------------------|
//! | `0..`       | zone bits, 8 zones per byte           |
//! | `8`         | partial-arm (stay) bit per area       |
//! | `10`        | full-arm (away) bit per area          |
//! | `12`, `14`  | exit-delay bits per area              |
//!
//! # Examples
//!
//! ```
//! use alarmpanel_lib::decoder::{byte_at, decode_area_mode};
//! use alarmpanel_lib::types::AreaMode;
//!
//! let blob = "00000000400100000000";
//! assert_eq!(byte_at(blob, 8), 0x40);
//! assert_eq!(decode_area_mode(blob, 0), AreaMode::Away);
//! ```

use crate::types::{AreaMode, ZoneNumber};

/// Char offset of the partial-arm (stay) byte.
pub const PARTIAL_ARM_OFFSET: usize = 8;
/// Char offset of the full-arm (away) byte.
pub const FULL_ARM_OFFSET: usize = 10;
/// Char offsets of the two exit-delay bytes.
pub const EXIT_DELAY_OFFSETS: [usize; 2] = [12, 14];

/// Returns the bit mask selecting `index` within its byte.
#[must_use]
pub const fn bit_mask(index: u8) -> u8 {
    1 << (index % 8)
}

/// Returns the byte starting at `char_offset`, or 0 when the blob is too
/// short or the two characters are not hex digits.
#[must_use]
pub fn byte_at(blob: &str, char_offset: usize) -> u8 {
    let Some(end) = char_offset.checked_add(2) else {
        return 0;
    };
    match blob.get(char_offset..end) {
        Some(pair) if pair.bytes().all(|b| b.is_ascii_hexdigit()) => {
            u8::from_str_radix(pair, 16).unwrap_or(0)
        }
        _ => 0,
    }
}

/// Decodes the arming mode of `area_index`.
///
/// Away wins over Stay when both bits are set. An area in exit delay is
/// reported as Disarmed; the exit bits are read but do not produce a mode
/// of their own.
#[must_use]
pub fn decode_area_mode(blob: &str, area_index: u8) -> AreaMode {
    let mask = bit_mask(area_index);
    let is_stay = byte_at(blob, PARTIAL_ARM_OFFSET) & mask != 0;
    let is_away = byte_at(blob, FULL_ARM_OFFSET) & mask != 0;
    let is_exit = EXIT_DELAY_OFFSETS
        .iter()
        .any(|&offset| byte_at(blob, offset) & mask != 0);

    if is_away {
        AreaMode::Away
    } else if is_stay {
        AreaMode::Stay
    } else {
        if is_exit {
            tracing::trace!(area_index, "area in exit delay, reporting disarmed");
        }
        AreaMode::Disarmed
    }
}

/// Returns whether `zone` is open.
///
/// With `open_when_set` the raw bit means open; without it the bit means
/// closed. `bank` is accepted but does not move the byte offset.
#[must_use]
pub fn is_zone_open(blob: &str, zone: ZoneNumber, _bank: u8, open_when_set: bool) -> bool {
    let zi = zone.index();
    let byte_offset = 2 * usize::from(zi / 8);
    let bit_set = byte_at(blob, byte_offset) & bit_mask(zi) != 0;
    if open_when_set { bit_set } else { !bit_set }
}
