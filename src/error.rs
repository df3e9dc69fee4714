// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `alarmpanel_lib` library.
//!
//! The protocol layer resolves exactly one class of failure itself (an
//! expired session, recovered by a single re-login and retry). Everything
//! else is surfaced through [`Error`] unchanged.
//!
//! [`Error`] is `Clone` so that a single failed login can be handed to every
//! caller that was waiting on it.

use std::sync::Arc;

use thiserror::Error;

/// Maximum number of characters of a response body kept for diagnostics.
pub(crate) const SNIPPET_LEN: usize = 120;

/// The main error type for this library.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The panel answered a login with its login page again.
    ///
    /// The credentials are wrong, or the user lacks the permissions needed
    /// for the request. Never retried automatically.
    #[error("authentication rejected by panel")]
    AuthRejected,

    /// The login response carried neither a session token nor a login form.
    #[error("unexpected login response: {snippet}")]
    AuthProtocol {
        /// Truncated response body.
        snippet: String,
    },

    /// A JSON response was expected but the body could not be parsed.
    #[error("malformed response ({message}): {snippet}")]
    MalformedResponse {
        /// Parser error message.
        message: String,
        /// Truncated response body.
        snippet: String,
    },

    /// The panel returned a structured error object.
    #[error("panel error: {0}")]
    Panel(serde_json::Value),

    /// A required field is missing from a JSON payload.
    #[error("missing field in response: {0}")]
    MissingField(&'static str),

    /// Error occurred during transport.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),
}

impl Error {
    /// Returns `true` if the error came from the authentication step.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthRejected | Self::AuthProtocol { .. })
    }

    pub(crate) fn auth_protocol(body: &str) -> Self {
        Self::AuthProtocol {
            snippet: snippet(body),
        }
    }

    pub(crate) fn malformed(err: &serde_json::Error, body: &str) -> Self {
        Self::MalformedResponse {
            message: err.to_string(),
            snippet: snippet(body),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Protocol(ProtocolError::from(err))
    }
}

/// Errors related to the HTTP transport.
#[derive(Debug, Clone, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(Arc<reqwest::Error>),

    /// The panel answered with a non-success HTTP status.
    #[error("HTTP {code} - {reason}")]
    Status {
        /// Numeric status code.
        code: u16,
        /// Canonical reason phrase.
        reason: String,
    },

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl From<reqwest::Error> for ProtocolError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(Arc::new(err))
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A PIN must be a non-empty string of ASCII digits.
    #[error("PIN must contain only digits")]
    InvalidPin,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Truncates `body` to [`SNIPPET_LEN`] characters for logs and errors.
pub(crate) fn snippet(body: &str) -> String {
    match body.char_indices().nth(SNIPPET_LEN) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
