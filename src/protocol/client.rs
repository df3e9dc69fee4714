// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authenticated HTTP client for the panel's embedded web server.

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response};

use crate::decoder::bit_mask;
use crate::error::{Error, ProtocolError, Result, snippet};
use crate::protocol::{KEY_FUNCTION_PATH, LOGIN_PATH, PanelApi, STATUS_PATH, form};
use crate::response::{CommandResult, PanelResponse, Status};
use crate::session::{Session, SessionStore, is_login_page, parse_login_response};
use crate::types::Pin;

/// Outcome of a single request, before any retry.
enum Reply {
    Body(String),
    /// The panel served its login page: the session is no longer valid.
    SessionExpired,
}

/// Everything needed to talk to the panel; cheap to clone.
#[derive(Debug, Clone)]
struct Transport {
    http: Client,
    base_url: String,
    username: String,
    pin: Pin,
}

impl Transport {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn login(self) -> Result<Session> {
        let url = self.url(LOGIN_PATH);
        let body = form::encode([("lgname", self.username.as_str()), ("lgpin", self.pin.as_str())]);

        tracing::debug!(url = %url, username = %self.username, "logging in to panel");

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, form::CONTENT_TYPE)
            .body(body)
            .send()
            .await?;
        let body = read_body(response).await?;

        parse_login_response(&body)
    }
}

async fn read_body(response: Response) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(ProtocolError::Status {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
        .into());
    }
    Ok(response.text().await?)
}

/// Client for the panel's session-authenticated web interface.
///
/// Every call makes sure a session exists first, frames the request as a
/// form carrying the session token, and recovers from an expired session
/// by logging in again and retrying the call once.
///
/// Clones share the same session.
///
/// # Examples
///
/// ```no_run
/// use alarmpanel_lib::protocol::PanelConfig;
/// use alarmpanel_lib::types::Pin;
///
/// # async fn example() -> alarmpanel_lib::Result<()> {
/// let client = PanelConfig::new("192.168.1.20", "user", Pin::new("1234")?).into_client()?;
///
/// let status = client.status(0).await?;
/// println!("area 0 is {}", status.area_mode());
///
/// client.key_function(15, 0).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ProtocolClient {
    transport: Transport,
    session: Arc<SessionStore>,
}

impl ProtocolClient {
    pub(crate) fn from_parts(http: Client, base_url: String, username: String, pin: Pin) -> Self {
        Self {
            transport: Transport {
                http,
                base_url,
                username,
                pin,
            },
            session: Arc::new(SessionStore::new()),
        }
    }

    /// Returns the base URL of the panel.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.transport.base_url
    }

    /// Returns the session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Drops the current session so the next call logs in again.
    pub fn invalidate_session(&self) {
        self.session.invalidate();
    }

    /// Returns the current session, logging in if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthRejected`] for refused credentials,
    /// [`Error::AuthProtocol`] for an unrecognised login response, or a
    /// transport error.
    pub async fn ensure_logged_in(&self) -> Result<Session> {
        self.session
            .ensure_logged_in(|| self.transport.clone().login())
            .await
    }

    /// Discards the current session and logs in again.
    ///
    /// # Errors
    ///
    /// Same as [`ensure_logged_in`](Self::ensure_logged_in).
    pub async fn login(&self) -> Result<Session> {
        self.session.login(|| self.transport.clone().login()).await
    }

    /// Issues an authenticated call.
    ///
    /// A `GET` carrying form fields is sent as a `POST`. If the panel answers
    /// with its login page, the session is renewed and the call is retried
    /// once; a second login page fails the call with
    /// [`Error::AuthRejected`].
    ///
    /// # Errors
    ///
    /// Returns an authentication or transport error, and with `expect_json`
    /// also [`Error::MalformedResponse`] or [`Error::Panel`].
    pub async fn call(
        &self,
        path: &str,
        method: Method,
        fields: &[(&str, String)],
        expect_json: bool,
    ) -> Result<PanelResponse> {
        let mut retry = true;
        loop {
            let session = self.ensure_logged_in().await?;
            match self.send(path, &method, fields, &session).await? {
                Reply::Body(body) => return PanelResponse::from_body(body, expect_json),
                Reply::SessionExpired if retry => {
                    tracing::warn!(path, "panel session expired, logging in again");
                    retry = false;
                    self.login().await?;
                }
                Reply::SessionExpired => {
                    tracing::warn!(path, "panel rejected a fresh session");
                    self.session.invalidate();
                    return Err(Error::AuthRejected);
                }
            }
        }
    }

    async fn send(
        &self,
        path: &str,
        method: &Method,
        fields: &[(&str, String)],
        session: &Session,
    ) -> Result<Reply> {
        let url = self.transport.url(path);

        let request = if *method == Method::GET && fields.is_empty() {
            self.transport.http.get(&url)
        } else {
            let method = if *method == Method::GET {
                Method::POST
            } else {
                method.clone()
            };
            self.transport
                .http
                .request(method, &url)
                .header(CONTENT_TYPE, form::CONTENT_TYPE)
                .body(form::encode_authenticated(session, fields))
        };

        tracing::debug!(url = %url, "sending panel request");

        let response = request.send().await?;
        let body = read_body(response).await?;

        tracing::debug!(body = %snippet(&body), "received panel response");

        if is_login_page(&body) {
            Ok(Reply::SessionExpired)
        } else {
            Ok(Reply::Body(body))
        }
    }

    /// Fetches the status of one area.
    ///
    /// # Errors
    ///
    /// Returns any [`call`](Self::call) error, or [`Error::MissingField`] if
    /// the payload has no `bankstates`.
    pub async fn status(&self, area_index: u8) -> Result<Status> {
        let fields = [("arsel", area_index.to_string())];
        let response = self.call(STATUS_PATH, Method::POST, &fields, true).await?;
        let payload = response
            .payload()
            .ok_or(Error::MissingField("bankstates"))?;
        Status::from_payload(area_index, payload)
    }

    /// Sends a key function (arm, disarm, ...) to one area.
    ///
    /// The area is addressed as a bit `mask` within the byte `start`.
    ///
    /// # Errors
    ///
    /// Returns any [`call`](Self::call) error.
    pub async fn key_function(&self, function_number: u8, area_index: u8) -> Result<CommandResult> {
        let (start, mask) = area_address(area_index);
        let fields = [
            ("fnum", function_number.to_string()),
            ("start", start.to_string()),
            ("mask", mask.to_string()),
        ];

        tracing::info!(function_number, area_index, "sending key function");

        let response = self
            .call(KEY_FUNCTION_PATH, Method::POST, &fields, false)
            .await?;
        Ok(CommandResult::new(
            function_number,
            area_index,
            response.into_body(),
        ))
    }
}

impl PanelApi for ProtocolClient {
    fn status(&self, area_index: u8) -> impl Future<Output = Result<Status>> + Send {
        ProtocolClient::status(self, area_index)
    }

    fn invalidate_session(&self) {
        ProtocolClient::invalidate_session(self);
    }
}

/// Returns the `(start, mask)` pair addressing `area_index`.
#[must_use]
pub fn area_address(area_index: u8) -> (u8, u8) {
    (area_index / 8, bit_mask(area_index))
}
