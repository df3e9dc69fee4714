// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol client for the panel's embedded web server.
//!
//! The panel's web interface is session based. A login with a username and
//! PIN returns an HTML page embedding a session token; every later request
//! is a form `POST` whose first field is that token. When the session
//! lapses the panel does not answer with an HTTP error but serves its login
//! page, which [`ProtocolClient`] detects and recovers from.
//!
//! # Endpoints
//!
//! | path                      | fields                  | reply            |
//! |---------------------------|-------------------------|------------------|
//! | [`LOGIN_PATH`]            | `lgname`, `lgpin`       | HTML with token  |
//! | [`STATUS_PATH`]           | `sess`, `arsel`         | JSON `bankstates`|
//! | [`KEY_FUNCTION_PATH`]     | `sess`, `fnum`, `start`, `mask` | HTML     |

mod client;
mod config;
pub mod form;

pub use client::{ProtocolClient, area_address};
pub use config::PanelConfig;

use crate::error::Result;
use crate::response::Status;

/// Login form endpoint.
pub const LOGIN_PATH: &str = "/login.cgi";
/// Area status endpoint.
pub const STATUS_PATH: &str = "/user/status.json";
/// Key function (command) endpoint.
pub const KEY_FUNCTION_PATH: &str = "/user/keyfunction.cgi";

/// The part of the panel API the status reconciler depends on.
///
/// [`ProtocolClient`] is the production implementation.
pub trait PanelApi: Send + Sync {
    /// Fetches the status of one area.
    ///
    /// # Errors
    ///
    /// Returns any error that prevented a decodable status from arriving.
    fn status(&self, area_index: u8) -> impl Future<Output = Result<Status>> + Send;

    /// Drops the current session so the next request re-authenticates.
    fn invalidate_session(&self);
}
