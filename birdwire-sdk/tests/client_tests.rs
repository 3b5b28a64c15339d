//! End-to-end client tests against a mock API server.
//!
//! # Design
//! Each test starts an axum server on a random port that imitates the few
//! endpoints it needs, then drives the real `Client` over HTTP. The mock
//! verifies OAuth signatures with the same signer the client uses, so a
//! signing regression shows up as an authentication error.

use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Form, Query, State};
use axum::body::Bytes;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use flate2::Compression;
use flate2::write::GzEncoder;
use time::OffsetDateTime;
use url::Url;

use birdwire_sdk::client::{Client, ClientError, MEDIA_UPLOAD_PATH, TimelineQuery};
use birdwire_sdk::config::{ClientConfig, ConsumerCredentials, UserCredentials};
use birdwire_sdk::objects::{CursoredLists, MediaResponse, timeline};
use birdwire_sdk::response::{ClassifiedError, ResponseError};
use birdwire_sdk::signature::{
    BearerToken, OAuth1Signer, SigningRequest, basic_credentials, parse_authorization_header,
};
use birdwire_sdk::RateLimitResponse;

const CONSUMER_KEY: &str = "consumer-key";
const CONSUMER_SECRET: &str = "consumer secret/with+symbols";
const USER_TOKEN: &str = "12345-user-token";
const USER_SECRET: &str = "user-secret";
const APP_TOKEN: &str = "AAAAAAAAAAAAAAAAAAAAA%2Fapp-token";
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-an-image";

#[derive(Clone, Default)]
struct MockState {
    base: String,
    token_requests: Arc<AtomicUsize>,
}

fn consumer() -> ConsumerCredentials {
    ConsumerCredentials::new(CONSUMER_KEY, CONSUMER_SECRET)
}

fn user() -> UserCredentials {
    UserCredentials::new(USER_TOKEN, USER_SECRET)
}

fn errors_body(code: i64, message: &str) -> String {
    format!(r#"{{"errors":[{{"code":{code},"message":"{message}"}}]}}"#)
}

// ============================================================================
// Mock endpoints
// ============================================================================

async fn token(State(state): State<MockState>, headers: HeaderMap, body: String) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);
    // Slow enough that concurrent first calls overlap.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if authorization != basic_credentials(&consumer()) || body != "grant_type=client_credentials" {
        return (StatusCode::FORBIDDEN, errors_body(99, "Unable to verify your credentials"))
            .into_response();
    }
    (
        StatusCode::OK,
        format!(r#"{{"token_type":"bearer","access_token":"{APP_TOKEN}"}}"#),
    )
        .into_response()
}

async fn user_timeline(
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let expected = format!("Bearer {APP_TOKEN}");
    if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return (StatusCode::UNAUTHORIZED, errors_body(89, "Invalid or expired token.")).into_response();
    }
    let name = params
        .iter()
        .find(|(k, _)| k == "screen_name")
        .map(|(_, v)| v.clone())
        .unwrap_or_default();
    let body = format!(
        r#"[{{"id_str":"1","text":"first","user":{{"screen_name":"{name}"}}}},{{"id_str":"2","text":"second","user":{{"screen_name":"{name}"}}}}]"#
    );
    (
        StatusCode::OK,
        [
            ("x-rate-limit-limit", "900"),
            ("x-rate-limit-remaining", "899"),
            ("x-rate-limit-reset", "1700000000"),
        ],
        body,
    )
        .into_response()
}

async fn search() -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        [
            ("X-Rate-Limit-Limit", "180"),
            ("X-Rate-Limit-Remaining", "0"),
            ("X-Rate-Limit-Reset", "1369331745"),
        ],
        errors_body(88, "Rate limit exceeded"),
    )
        .into_response()
}

async fn update_status(
    State(state): State<MockState>,
    headers: HeaderMap,
    Form(form): Form<Vec<(String, String)>>,
) -> Response {
    if signature_is_valid(&state, &headers, "1.1/statuses/update.json", &form) {
        (StatusCode::FORBIDDEN, errors_body(187, "Status is a duplicate.")).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, errors_body(32, "Could not authenticate you.")).into_response()
    }
}

fn signature_is_valid(
    state: &MockState,
    headers: &HeaderMap,
    path: &str,
    form: &[(String, String)],
) -> bool {
    let Some(header) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let Ok(fields) = parse_authorization_header(header) else {
        return false;
    };
    let field = |name: &str| {
        fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    };
    let Ok(timestamp) = field("oauth_timestamp").parse::<i64>() else {
        return false;
    };
    let Ok(url) = Url::parse(&format!("{}{path}", state.base)) else {
        return false;
    };
    let request = SigningRequest {
        method: "POST",
        url: &url,
        form,
    };
    let Ok(expected) = OAuth1Signer::new(consumer(), user()).authorization_with(
        &request,
        &field("oauth_nonce"),
        timestamp,
    ) else {
        return false;
    };
    field("oauth_token") == USER_TOKEN && expected == header
}

async fn media_upload(State(state): State<MockState>, headers: HeaderMap, body: Bytes) -> Response {
    // Multipart parameters are not part of the signature.
    if !signature_is_valid(&state, &headers, MEDIA_UPLOAD_PATH, &[]) {
        return (StatusCode::UNAUTHORIZED, errors_body(32, "Could not authenticate you.")).into_response();
    }
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let text = String::from_utf8_lossy(&body);
    let has_media_part = text.contains(r#"name="media"; filename="media.png""#)
        && body.windows(PNG_BYTES.len()).any(|w| w == PNG_BYTES);
    if !content_type.starts_with("multipart/form-data; boundary=") || !has_media_part {
        return (StatusCode::BAD_REQUEST, errors_body(38, "media parameter is missing.")).into_response();
    }
    (
        StatusCode::OK,
        [
            ("X-MediaRateLimit-Limit", "500"),
            ("X-MediaRateLimit-Remaining", "499"),
            ("X-MediaRateLimit-Reset", "1700003600"),
        ],
        format!(
            r#"{{"media_id":710511363345354753,"media_id_string":"710511363345354753","size":{},"expires_after_secs":86400,"image":{{"image_type":"image/png","w":1,"h":1}}}}"#,
            body.len()
        ),
    )
        .into_response()
}

async fn welcome_message(State(state): State<MockState>, headers: HeaderMap, body: Bytes) -> Response {
    if !signature_is_valid(&state, &headers, "1.1/direct_messages/welcome_messages/new.json", &[]) {
        return (StatusCode::UNAUTHORIZED, errors_body(32, "Could not authenticate you.")).into_response();
    }
    if headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) != Some("application/json") {
        return (StatusCode::UNSUPPORTED_MEDIA_TYPE, errors_body(38, "JSON body expected.")).into_response();
    }
    // Echo the body back.
    (StatusCode::OK, body).into_response()
}

async fn verify_credentials() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "<html><body>Internal Server Error</body></html>",
    )
        .into_response()
}

async fn list_ownerships() -> Response {
    let body = br#"{"next_cursor":0,"next_cursor_str":"0","previous_cursor":0,"previous_cursor_str":"0",
        "lists":[{"id_str":"574","slug":"team","full_name":"@twitterapi/team","member_count":43}]}"#;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    if encoder.write_all(body).is_err() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    match encoder.finish() {
        Ok(zipped) => (StatusCode::OK, [("content-encoding", "gzip")], zipped).into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn rate_limit_status() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn spawn_mock() -> (SocketAddr, MockState) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = MockState {
        base: format!("http://{addr}/"),
        ..MockState::default()
    };
    let app = Router::new()
        .route("/oauth2/token", post(token))
        .route("/1.1/statuses/user_timeline.json", get(user_timeline))
        .route("/1.1/search/tweets.json", get(search))
        .route("/1.1/statuses/update.json", post(update_status))
        .route("/1.1/account/verify_credentials.json", get(verify_credentials))
        .route("/1.1/lists/ownerships.json", get(list_ownerships))
        .route("/1.1/application/rate_limit_status.json", get(rate_limit_status))
        .route("/1.1/media/upload.json", post(media_upload))
        .route(
            "/1.1/direct_messages/welcome_messages/new.json",
            post(welcome_message),
        )
        .with_state(state.clone());
    tokio::spawn(async move { axum::serve(listener, app).await });
    (addr, state)
}

fn client_for(addr: SocketAddr, user: Option<UserCredentials>) -> Client {
    let config = ClientConfig {
        host: format!("http://{addr}"),
        upload_host: format!("http://{addr}"),
        timeout: Some(Duration::from_secs(10)),
        ..ClientConfig::default()
    };
    Client::new(&config, consumer(), user).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_app_only_timeline_fetches_token_once() {
    let (addr, state) = spawn_mock().await;
    let client = client_for(addr, None);
    assert!(!client.is_user_context());

    let query = TimelineQuery::for_screen_name("jack");
    let payload = client.user_timeline(&query).await.unwrap();
    let tweets = timeline(payload.value());
    assert_eq!(tweets.len(), 2);
    assert_eq!(tweets[0].id(), 1);
    assert_eq!(tweets[1].user().screen_name(), "jack");
    assert!(payload.has_rate_limit());
    assert_eq!(payload.rate_limit(), 900);
    assert_eq!(payload.rate_limit_remaining(), 899);

    let again = client.clone().user_timeline(&query).await.unwrap();
    assert_eq!(timeline(again.value()).len(), 2);
    assert_eq!(state.token_requests.load(Ordering::SeqCst), 1);
    assert_eq!(
        client.app_token().await.map(|t| t.access_token().to_string()),
        Some(APP_TOKEN.to_string())
    );
}

#[tokio::test]
async fn test_stale_app_token_gives_structured_error() {
    let (addr, state) = spawn_mock().await;
    let client = client_for(addr, None);
    client.set_app_token(BearerToken::new("expired")).await;

    let err = client
        .user_timeline(&TimelineQuery::default())
        .await
        .unwrap_err();
    match err {
        ClientError::Response(ClassifiedError::Api(list)) => assert!(list.has_code(89)),
        other => panic!("expected api error, got {other:?}"),
    }
    assert_eq!(state.token_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rate_limited_search() {
    let (addr, _) = spawn_mock().await;
    let client = client_for(addr, Some(user()));

    let err = client.search("rust", Some(10), false).await.unwrap_err();
    let limit = err.as_rate_limit().expect("rate limit error");
    assert_eq!(limit.rate_limit(), 180);
    assert_eq!(limit.rate_limit_remaining(), 0);
    assert_eq!(
        limit.rate_limit_reset(),
        OffsetDateTime::from_unix_timestamp(1369331745).unwrap()
    );
}

#[tokio::test]
async fn test_signed_update_reaches_server_intact() {
    let (addr, _) = spawn_mock().await;
    let client = client_for(addr, Some(user()));
    assert!(client.is_user_context());

    // The mock answers 187 only when the OAuth signature checks out.
    let err = client
        .update_status("Hello Ladies + Gentlemen, a signed OAuth request!", None)
        .await
        .unwrap_err();
    match err {
        ClientError::Response(ClassifiedError::Api(list)) => {
            assert_eq!(list.errors.len(), 1);
            assert_eq!(list.errors[0].code, 187);
            assert_eq!(list.errors[0].message, "Status is a duplicate.");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_opaque_server_error() {
    let (addr, _) = spawn_mock().await;
    let client = client_for(addr, Some(user()));

    let err = client.verify_credentials().await.unwrap_err();
    match err {
        ClientError::Response(ClassifiedError::Response(ResponseError { status, body })) => {
            assert_eq!(status, 500);
            assert!(body.contains("Internal Server Error"));
        }
        other => panic!("expected response error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_gzip_response_is_decoded() {
    let (addr, _) = spawn_mock().await;
    let client = client_for(addr, Some(user()));

    let payload = client
        .list_ownerships(Some("twitterapi"), None, None)
        .await
        .unwrap();
    let page = CursoredLists::from_value(payload.value()).unwrap();
    assert_eq!(page.next_cursor(), 0);
    let lists = page.lists();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].full_name(), "@twitterapi/team");
    assert_eq!(lists[0].member_count(), 43);
}

#[tokio::test]
async fn test_no_content_has_no_body() {
    let (addr, _) = spawn_mock().await;
    let client = client_for(addr, Some(user()));

    let payload = client.rate_limit_status(&["statuses"]).await.unwrap();
    assert_eq!(payload.status, 204);
    assert!(payload.body.is_none());
    assert!(payload.value().is_null());
    assert!(!payload.has_rate_limit());
}

#[tokio::test]
async fn test_concurrent_first_calls_share_one_token() {
    let (addr, state) = spawn_mock().await;
    let client = client_for(addr, None);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .user_timeline(&TimelineQuery::for_screen_name("jack"))
                    .await
            })
        })
        .collect();
    for handle in handles {
        let payload = handle.await.unwrap().unwrap();
        assert_eq!(timeline(payload.value()).len(), 2);
    }
    assert_eq!(state.token_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_media_upload_sends_multipart() {
    let (addr, _) = spawn_mock().await;
    let client = client_for(addr, Some(user()));

    let payload = client
        .upload_media(PNG_BYTES.to_vec(), "media.png", "image/png")
        .await
        .unwrap();
    let media = MediaResponse::from_value(payload.value()).unwrap();
    assert_eq!(media.media_id(), 710511363345354753);
    assert_eq!(media.media_id_string(), "710511363345354753");
    assert!(media.size() > PNG_BYTES.len() as i64);
    assert_eq!(media.expires_after_secs(), 86400);

    assert!(payload.has_media_rate_limit());
    assert_eq!(payload.media_rate_limit(), 500);
    assert_eq!(payload.media_rate_limit_remaining(), 499);
    assert!(!payload.has_rate_limit());
}

#[tokio::test]
async fn test_raw_body_to_absolute_url() {
    let (addr, _) = spawn_mock().await;
    let client = client_for(addr, Some(user()));

    let body = r#"{"welcome_message":{"message_data":{"text":"hi"}}}"#;
    let target = format!("http://{addr}/1.1/direct_messages/welcome_messages/new.json");
    let payload = client
        .send_body(
            reqwest::Method::POST,
            &target,
            &[],
            body.to_string(),
            "application/json",
        )
        .await
        .unwrap();
    let text = payload
        .value()
        .get("welcome_message")
        .and_then(|m| m.get("message_data"))
        .and_then(|d| d.get("text"))
        .and_then(|t| t.as_str());
    assert_eq!(text, Some("hi"));
}
