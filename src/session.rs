// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session token storage and single-flight login coordination.
//!
//! The panel hands out a 16-character hex token after a successful login.
//! [`SessionStore`] owns that token and makes sure that concurrent callers
//! needing a session converge on one login round trip: the first caller
//! starts the attempt, every later caller awaits the same shared future and
//! receives the same outcome, success or failure.
//!
//! The store does not know how to talk to the panel. The caller passes the
//! login attempt as a closure, which is only invoked when a new attempt has
//! to be started.

use std::fmt;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use regex::Regex;

use crate::error::{Error, Result};

/// Length of a session token in characters.
pub const TOKEN_LEN: usize = 16;

/// Primary location of the token: the accessor function emitted in the
/// page's inline script.
static PRIMARY_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"getSession\(\)\s*\{\s*return\s*["']([0-9A-Fa-f]{16})["']"#)
        .expect("valid token pattern")
});

/// Fallback: any `sess` assignment or hidden input carrying the token.
static FALLBACK_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bsess\b["']?\s*(?:[:=]|value\s*=)?\s*["']?([0-9a-f]{16})\b"#)
        .expect("valid fallback token pattern")
});

/// Form field names that only appear on the panel's login page.
const LOGIN_PAGE_MARKERS: [&str; 2] = ["lgname", "lgpin"];

/// An opaque session token issued by the panel.
///
/// # Examples
///
/// ```
/// use alarmpanel_lib::session::Session;
///
/// let session = Session::parse("0123456789ABCDEF").unwrap();
/// assert_eq!(session.as_str(), "0123456789ABCDEF");
/// assert!(Session::parse("xyz").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Session(String);

impl Session {
    /// Parses a token, accepting exactly 16 hex digits.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        (token.len() == TOKEN_LEN && token.bytes().all(|b| b.is_ascii_hexdigit()))
            .then(|| Self(token.to_string()))
    }

    /// Returns the token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns `true` if `body` is the panel's login page.
///
/// The panel never answers an unauthenticated request with an HTTP error;
/// it serves the login form instead.
#[must_use]
pub fn is_login_page(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    LOGIN_PAGE_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Extracts the session token from a login response body.
#[must_use]
pub fn extract_token(body: &str) -> Option<Session> {
    [&*PRIMARY_TOKEN, &*FALLBACK_TOKEN]
        .into_iter()
        .find_map(|pattern| pattern.captures(body))
        .and_then(|caps| caps.get(1))
        .and_then(|m| Session::parse(m.as_str()))
}

/// Classifies a login response body.
///
/// # Errors
///
/// Returns [`Error::AuthRejected`] when the login page came back, and
/// [`Error::AuthProtocol`] when the body is neither a token-bearing page
/// nor the login page.
pub fn parse_login_response(body: &str) -> Result<Session> {
    if let Some(session) = extract_token(body) {
        return Ok(session);
    }
    if is_login_page(body) {
        Err(Error::AuthRejected)
    } else {
        Err(Error::auth_protocol(body))
    }
}

type LoginFuture = Shared<BoxFuture<'static, Result<Session>>>;

/// Holds the current session and coordinates logins.
///
/// # Examples
///
/// ```
/// use alarmpanel_lib::session::{Session, SessionStore};
///
/// # async fn example() -> alarmpanel_lib::Result<()> {
/// let store = SessionStore::new();
/// let session = store
///     .ensure_logged_in(|| async { Ok(Session::parse("0123456789abcdef").unwrap()) })
///     .await?;
/// assert_eq!(store.current(), Some(session));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SessionStore {
    token: Arc<RwLock<Option<Session>>>,
    pending: Arc<Mutex<Option<(u64, LoginFuture)>>>,
    attempts: AtomicU64,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current session, if any.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.token.read().clone()
    }

    /// Drops the current session.
    pub fn invalidate(&self) {
        if self.token.write().take().is_some() {
            tracing::debug!("session invalidated");
        }
    }

    /// Returns `true` while a login attempt is in flight.
    #[must_use]
    pub fn is_login_pending(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// Returns the number of login attempts started so far.
    #[must_use]
    pub fn login_attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Returns the current session, logging in first if there is none.
    ///
    /// # Errors
    ///
    /// Returns the error of the login attempt.
    pub async fn ensure_logged_in<F, Fut>(&self, authenticate: F) -> Result<Session>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Session>> + Send + 'static,
    {
        if let Some(session) = self.current() {
            return Ok(session);
        }
        self.acquire(authenticate, false).await
    }

    /// Discards the current session and logs in again.
    ///
    /// If an attempt is already in flight, this joins it instead of starting
    /// another one; `authenticate` is then never called.
    ///
    /// # Errors
    ///
    /// Returns the error of the login attempt.
    pub async fn login<F, Fut>(&self, authenticate: F) -> Result<Session>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Session>> + Send + 'static,
    {
        self.acquire(authenticate, true).await
    }

    async fn acquire<F, Fut>(&self, authenticate: F, discard_existing: bool) -> Result<Session>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Session>> + Send + 'static,
    {
        let attempt = {
            let mut pending = self.pending.lock();
            if let Some((_, attempt)) = pending.as_ref() {
                tracing::debug!("joining in-flight login");
                attempt.clone()
            } else {
                // An attempt stores its token before releasing the slot, so a
                // login that finished since the unlocked check is visible here
                if !discard_existing && let Some(session) = self.current() {
                    return Ok(session);
                }
                self.token.write().take();
                let id = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
                let attempt = Self::start(
                    id,
                    authenticate(),
                    Arc::clone(&self.token),
                    Arc::clone(&self.pending),
                );
                *pending = Some((id, attempt.clone()));
                attempt
            }
        };
        attempt.await
    }

    fn start<Fut>(
        id: u64,
        authenticate: Fut,
        token: Arc<RwLock<Option<Session>>>,
        pending: Arc<Mutex<Option<(u64, LoginFuture)>>>,
    ) -> LoginFuture
    where
        Fut: Future<Output = Result<Session>> + Send + 'static,
    {
        async move {
            let result = authenticate.await;
            match &result {
                Ok(session) => {
                    *token.write() = Some(session.clone());
                    tracing::info!(session = %session, "acquired panel session");
                }
                Err(err) => tracing::warn!(error = %err, "panel login failed"),
            }
            let mut slot = pending.lock();
            if slot.as_ref().is_some_and(|(current, _)| *current == id) {
                *slot = None;
            }
            result
        }
        .boxed()
        .shared()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("logged_in", &self.token.read().is_some())
            .field("login_pending", &self.is_login_pending())
            .field("login_attempts", &self.login_attempts())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    use super::*;

    const TOKEN: &str = "0123456789ABCDEF";

    fn session() -> Session {
        Session::parse(TOKEN).unwrap()
    }

    #[test]
    fn session_parse_rejects_wrong_length() {
        assert!(Session::parse("0123456789ABCDE").is_none());
        assert!(Session::parse("0123456789ABCDEF0").is_none());
        assert!(Session::parse("0123456789ABCDEG").is_none());
    }

    #[test]
    fn extract_token_primary_pattern() {
        let body = r#"<script>function getSession(){ return "0123456789ABCDEF"; }</script>"#;
        assert_eq!(extract_token(body), Some(session()));
    }

    #[test]
    fn extract_token_fallback_pattern() {
        let body = r#"<input type="hidden" name="sess" value="0123456789abcdef">"#;
        assert_eq!(extract_token(body).unwrap().as_str(), "0123456789abcdef");

        let body = "var sess = '0123456789ABCDEF';";
        assert_eq!(extract_token(body), Some(session()));
    }

    #[test]
    fn extract_token_prefers_primary() {
        let body = concat!(
            r#"var sess="AAAAAAAAAAAAAAAA";"#,
            r#"function getSession(){return "0123456789ABCDEF";}"#
        );
        assert_eq!(extract_token(body), Some(session()));
    }

    #[test]
    fn login_page_markers() {
        assert!(is_login_page(r#"<input name="lgname"><input name="lgpin">"#));
        assert!(is_login_page("<INPUT NAME=LGPIN>"));
        assert!(!is_login_page(r#"{"bankstates":"00"}"#));
    }

    #[test]
    fn parse_login_response_classifies() {
        assert!(matches!(
            parse_login_response(r#"<form><input name="lgname"></form>"#),
            Err(Error::AuthRejected)
        ));
        assert!(matches!(
            parse_login_response("<html>maintenance</html>"),
            Err(Error::AuthProtocol { .. })
        ));
        assert_eq!(
            parse_login_response(r#"getSession(){return "0123456789ABCDEF"}"#).unwrap(),
            session()
        );
    }

    #[tokio::test]
    async fn ensure_logged_in_reuses_session() {
        let store = SessionStore::new();
        let calls = Arc::new(AtomicU32::new(0));

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            store
                .ensure_logged_in(move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(session())
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.login_attempts(), 1);
    }

    #[tokio::test]
    async fn login_discards_existing_session() {
        let store = SessionStore::new();
        store.login(|| async { Ok(session()) }).await.unwrap();

        let result = store.login(|| async { Err(Error::AuthRejected) }).await;

        assert!(matches!(result, Err(Error::AuthRejected)));
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn invalidate_clears_session() {
        let store = SessionStore::new();
        store.login(|| async { Ok(session()) }).await.unwrap();
        store.invalidate();
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn session_stored_after_unlocked_check_is_kept() {
        // A caller that saw no session, then finds one once it holds the
        // slot, must not discard it
        let store = SessionStore::new();
        store.login(|| async { Ok(session()) }).await.unwrap();
        let calls = Arc::new(AtomicU32::new(0));

        let calls_clone = Arc::clone(&calls);
        let result = store
            .acquire(
                move || async move {
                    calls_clone.fetch_add(1, Ordering::SeqCst);
                    Err(Error::AuthRejected)
                },
                false,
            )
            .await;

        assert_eq!(result.unwrap(), session());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.login_attempts(), 1);
        assert_eq!(store.current(), Some(session()));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_login() {
        let store = Arc::new(SessionStore::new());
        let calls = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                store
                    .ensure_logged_in(move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(session())
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), session());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!store.is_login_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_fail_together() {
        let store = Arc::new(SessionStore::new());
        let calls = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let store = Arc::clone(&store);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                store
                    .ensure_logged_in(move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Err(Error::AuthRejected)
                    })
                    .await
            }));
        }

        for handle in handles {
            assert!(matches!(handle.await.unwrap(), Err(Error::AuthRejected)));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn new_attempt_after_completed_one() {
        let store = SessionStore::new();
        store
            .login(|| async { Err(Error::AuthRejected) })
            .await
            .unwrap_err();
        let session = store.login(|| async { Ok(session()) }).await.unwrap();

        assert_eq!(store.current(), Some(session));
        assert_eq!(store.login_attempts(), 2);
    }
}
