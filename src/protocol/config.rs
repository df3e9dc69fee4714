// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection configuration for a panel.

use std::time::Duration;

use reqwest::Client;

use crate::error::{ProtocolError, Result};
use crate::protocol::ProtocolClient;
use crate::types::Pin;

/// Configuration for a panel's embedded web server.
///
/// The panel only speaks plaintext HTTP. The username and PIN are those of
/// a panel user allowed to arm and disarm.
///
/// # Examples
///
/// ```
/// use alarmpanel_lib::protocol::PanelConfig;
/// use alarmpanel_lib::types::Pin;
/// use std::time::Duration;
///
/// let config = PanelConfig::new("192.168.1.20", "installer", Pin::new("1234").unwrap())
///     .with_port(8080)
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), "http://192.168.1.20:8080");
/// ```
#[derive(Debug, Clone)]
pub struct PanelConfig {
    host: String,
    port: u16,
    username: String,
    pin: Pin,
    timeout: Duration,
}

impl PanelConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the specified host and user.
    ///
    /// `host` may be a bare hostname or IP address, or a full `http://` URL,
    /// in which case the port setting is ignored.
    #[must_use]
    pub fn new(host: impl Into<String>, username: impl Into<String>, pin: Pin) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            username: username.into(),
            pin,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the PIN.
    #[must_use]
    pub fn pin(&self) -> &Pin {
        &self.pin
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            return self.host.trim_end_matches('/').to_string();
        }
        if self.port == Self::DEFAULT_PORT {
            format!("http://{}", self.host)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    /// Creates a [`ProtocolClient`] from this configuration.
    ///
    /// The underlying HTTP client keeps a cookie store, since the panel also
    /// tracks the session through a cookie.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be
    /// created.
    pub fn into_client(self) -> Result<ProtocolClient> {
        if self.host.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()).into());
        }

        let base_url = self.base_url();
        let http = Client::builder()
            .cookie_store(true)
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::from)?;

        Ok(ProtocolClient::from_parts(
            http,
            base_url,
            self.username,
            self.pin,
        ))
    }
}
