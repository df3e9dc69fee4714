// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generic response of an authenticated panel call.

use serde_json::Value;

use crate::error::{Error, Result};

/// Response of a [`ProtocolClient::call`](crate::protocol::ProtocolClient::call).
#[derive(Debug, Clone)]
pub struct PanelResponse {
    body: String,
    payload: Option<Value>,
}

impl PanelResponse {
    /// Builds a response from a raw body.
    ///
    /// With `expect_json`, the body must parse as JSON and must not carry an
    /// embedded `error` object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if the body is not JSON, and
    /// [`Error::Panel`] if the payload reports an error.
    pub fn from_body(body: String, expect_json: bool) -> Result<Self> {
        if !expect_json {
            return Ok(Self {
                body,
                payload: None,
            });
        }

        let payload: Value =
            serde_json::from_str(&body).map_err(|err| Error::malformed(&err, &body))?;

        if let Some(error) = payload.get("error").filter(|e| e.is_object()) {
            return Err(Error::Panel(error.clone()));
        }

        Ok(Self {
            body,
            payload: Some(payload),
        })
    }

    /// Returns the raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the parsed JSON payload, if JSON was expected.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Consumes the response, returning the raw body.
    #[must_use]
    pub fn into_body(self) -> String {
        self.body
    }
}
