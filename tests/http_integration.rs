// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the panel protocol using wiremock.

use std::time::Duration;

use alarmpanel_lib::protocol::{KEY_FUNCTION_PATH, LOGIN_PATH, STATUS_PATH};
use alarmpanel_lib::types::{AreaMode, Pin};
use alarmpanel_lib::{Error, PanelConfig, ProtocolClient, ProtocolError};
use reqwest::Method;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "0123456789ABCDEF";

const LOGIN_PAGE: &str = r#"<html><body><form action="/login.cgi" method="post">
<input type="text" name="lgname"><input type="password" name="lgpin">
</form></body></html>"#;

fn token_page() -> String {
    format!(
        r#"<html><head><script>function getSession(){{return "{TOKEN}";}}</script></head><body>Welcome</body></html>"#
    )
}

fn client(server: &MockServer) -> ProtocolClient {
    PanelConfig::new(server.uri(), "user", Pin::new("1234").unwrap())
        .into_client()
        .unwrap()
}

async fn mount_login(server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .and(body_string_contains("lgname=user"))
        .and(body_string_contains("lgpin=1234"))
        .respond_with(ResponseTemplate::new(200).set_body_string(token_page()))
        .expect(expected)
        .mount(server)
        .await;
}

fn status_json(bankstates: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "bankstates": bankstates }))
}

// ============================================================================
// Login Tests
// ============================================================================

mod login {
    use super::*;

    #[tokio::test]
    async fn login_extracts_token() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;

        let client = client(&server);
        let session = client.ensure_logged_in().await.unwrap();

        assert_eq!(session.as_str(), TOKEN);
        assert_eq!(client.session().current(), Some(session));
    }

    #[tokio::test]
    async fn existing_session_is_reused() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;

        let client = client(&server);
        let first = client.ensure_logged_in().await.unwrap();
        let second = client.ensure_logged_in().await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(token_page())
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let results =
            futures::future::join_all((0..8).map(|_| client.ensure_logged_in())).await;

        for result in results {
            assert_eq!(result.unwrap().as_str(), TOKEN);
        }
        assert_eq!(client.session().login_attempts(), 1);
    }

    #[tokio::test]
    async fn concurrent_callers_fail_together() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(LOGIN_PAGE)
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let results =
            futures::future::join_all((0..4).map(|_| client.ensure_logged_in())).await;

        for result in results {
            assert!(matches!(result, Err(Error::AuthRejected)));
        }
        assert!(client.session().current().is_none());
    }

    #[tokio::test]
    async fn rejected_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
            .mount(&server)
            .await;

        let err = client(&server).ensure_logged_in().await.unwrap_err();
        assert!(matches!(err, Error::AuthRejected));
    }

    #[tokio::test]
    async fn unexpected_login_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html>Under maintenance</html>"),
            )
            .mount(&server)
            .await;

        match client(&server).ensure_logged_in().await {
            Err(Error::AuthProtocol { snippet }) => assert!(snippet.contains("maintenance")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn explicit_login_replaces_session() {
        let server = MockServer::start().await;
        mount_login(&server, 2).await;

        let client = client(&server);
        client.ensure_logged_in().await.unwrap();
        client.login().await.unwrap();

        assert_eq!(client.session().login_attempts(), 2);
    }

    #[tokio::test]
    async fn http_error_on_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client(&server).ensure_logged_in().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::Status { code: 503, .. })
        ));
    }
}

// ============================================================================
// Status Tests
// ============================================================================

mod status {
    use super::*;

    #[tokio::test]
    async fn status_sends_session_first() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("POST"))
            .and(path(STATUS_PATH))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains(format!("sess={TOKEN}&arsel=0").as_str()))
            .respond_with(status_json("00000000400100000000"))
            .expect(1)
            .mount(&server)
            .await;

        let status = client(&server).status(0).await.unwrap();

        assert_eq!(status.area_index(), 0);
        assert_eq!(status.area_mode(), AreaMode::Away);
    }

    #[tokio::test]
    async fn session_cookie_is_sent_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "SESS=abc123; Path=/")
                    .set_body_string(token_page()),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(STATUS_PATH))
            .and(header("cookie", "SESS=abc123"))
            .respond_with(status_json("00000000010000000000"))
            .expect(1)
            .mount(&server)
            .await;

        let status = client(&server).status(0).await.unwrap();
        assert_eq!(status.area_mode(), AreaMode::Stay);
    }

    #[tokio::test]
    async fn expired_session_relogs_and_retries_once() {
        let server = MockServer::start().await;
        mount_login(&server, 2).await;
        Mock::given(method("POST"))
            .and(path(STATUS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(STATUS_PATH))
            .respond_with(status_json("00000000010000000000"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let status = client.status(0).await.unwrap();

        assert_eq!(status.area_mode(), AreaMode::Stay);
        assert_eq!(client.session().login_attempts(), 2);
    }

    #[tokio::test]
    async fn persistent_expiry_fails_without_third_attempt() {
        let server = MockServer::start().await;
        mount_login(&server, 2).await;
        Mock::given(method("POST"))
            .and(path(STATUS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
            .expect(2)
            .mount(&server)
            .await;

        let client = client(&server);
        let err = client.status(0).await.unwrap_err();

        assert!(matches!(err, Error::AuthRejected));
        assert!(client.session().current().is_none());
    }

    #[tokio::test]
    async fn malformed_json() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("POST"))
            .and(path(STATUS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        match client(&server).status(0).await {
            Err(Error::MalformedResponse { snippet, .. }) => {
                assert_eq!(snippet, "<html>oops</html>");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn panel_error_object() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("POST"))
            .and(path(STATUS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": { "code": 3, "message": "access denied" }
            })))
            .mount(&server)
            .await;

        match client(&server).status(0).await {
            Err(Error::Panel(error)) => assert_eq!(error["code"], 3),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_bankstates() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("POST"))
            .and(path(STATUS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": ""
            })))
            .mount(&server)
            .await;

        let err = client(&server).status(0).await.unwrap_err();
        assert!(matches!(err, Error::MissingField("bankstates")));
    }

    #[tokio::test]
    async fn http_error_is_surfaced() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("POST"))
            .and(path(STATUS_PATH))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).status(0).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::Status { code: 500, .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_panel_is_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let base_url = format!("http://127.0.0.1:{port}");
        let client = PanelConfig::new(base_url, "user", Pin::new("1234").unwrap())
            .with_timeout(Duration::from_secs(2))
            .into_client()
            .unwrap();

        let err = client.status(0).await.unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolError::Http(_))));
        assert!(client.session().current().is_none());
    }
}

// ============================================================================
// Command Tests
// ============================================================================

mod commands {
    use super::*;

    #[tokio::test]
    async fn key_function_first_area() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("POST"))
            .and(path(KEY_FUNCTION_PATH))
            .and(body_string_contains(
                format!("sess={TOKEN}&fnum=15&start=0&mask=1").as_str(),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server).key_function(15, 0).await.unwrap();

        assert_eq!(result.function_number(), 15);
        assert_eq!(result.area_index(), 0);
        assert_eq!(result.body(), "OK");
        assert!(!result.is_empty());
    }

    #[tokio::test]
    async fn key_function_second_byte() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("POST"))
            .and(path(KEY_FUNCTION_PATH))
            .and(body_string_contains("fnum=0&start=1&mask=2"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server).key_function(0, 9).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn get_with_fields_is_sent_as_post() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("POST"))
            .and(path("/user/zones.json"))
            .and(body_string_contains(format!("sess={TOKEN}&zone=3").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .call("/user/zones.json", Method::GET, &[("zone", "3".to_string())], true)
            .await
            .unwrap();
        assert!(response.payload().is_some());
    }

    #[tokio::test]
    async fn get_without_fields_stays_get() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/user/info.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>info</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .call("/user/info.html", Method::GET, &[], false)
            .await
            .unwrap();
        assert_eq!(response.body(), "<html>info</html>");
        assert!(response.payload().is_none());
    }

    #[tokio::test]
    async fn field_values_are_url_encoded() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("POST"))
            .and(path("/user/label.cgi"))
            .and(body_string_contains("name=Front%20Door%20%26%20Hall"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .call(
                "/user/label.cgi",
                Method::POST,
                &[("name", "Front Door & Hall".to_string())],
                false,
            )
            .await
            .unwrap();
    }
}
