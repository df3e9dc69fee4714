// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key function command reply.

/// Reply to a key function command.
///
/// The panel answers commands with a page whose content carries no stable
/// meaning; reaching it without being sent back to the login page is the
/// success signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    function_number: u8,
    area_index: u8,
    body: String,
}

impl CommandResult {
    pub(crate) fn new(function_number: u8, area_index: u8, body: String) -> Self {
        Self {
            function_number,
            area_index,
            body,
        }
    }

    /// Returns the key function number that was sent.
    #[must_use]
    pub fn function_number(&self) -> u8 {
        self.function_number
    }

    /// Returns the area the command addressed.
    #[must_use]
    pub fn area_index(&self) -> u8 {
        self.area_index
    }

    /// Returns the raw reply body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns `true` if the panel sent an empty reply.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}
