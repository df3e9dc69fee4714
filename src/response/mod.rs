// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types returned by the panel.
//!
//! - [`PanelResponse`] - Raw body of any authenticated call, optionally parsed as JSON
//! - [`Status`] - Status of one area, carrying the `bankstates` blob
//! - [`CommandResult`] - Reply to a key function command

mod command;
mod panel;
mod status;

pub use command::CommandResult;
pub use panel::PanelResponse;
pub use status::Status;
