//! Async HTTP client for the Twitter REST API.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need signing or decoding do not pull in `reqwest`.
//!
//! Every call goes through the same pipeline: build the URL, sign it, send
//! it, read the whole body, then hand status, headers and body to
//! [`ApiResponse::parse`]. The connection is therefore always drained, and
//! every non-success outcome surfaces as a [`ClassifiedError`] inside
//! [`ClientError::Response`].

mod account;
mod lists;
mod media;
mod search;
mod timeline;
mod token;

pub use media::MEDIA_UPLOAD_PATH;
pub use timeline::TimelineQuery;
pub use token::TOKEN_PATH;

use std::sync::Arc;

use bytes::Buf;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

use birdwire_core::response::{
    ApiResponse, ClassifiedError, Headers, RateLimitResponse, RateLimitWindow,
};
use birdwire_core::value::Value;

use crate::config::{ClientConfig, ConsumerCredentials, UserCredentials};
use crate::signature::{BearerToken, OAuth1Signer, SignatureError, Signer, SigningRequest};

/// Path prefix of the v1.1 REST endpoints.
pub const API_PREFIX: &str = "1.1/";

static NULL: Value = Value::Null;

/// Errors produced by the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request could not be signed.
    #[error("signature error: {0}")]
    Signature(#[from] SignatureError),

    /// The base URL could not be joined with the endpoint path, or an
    /// absolute target did not parse.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The server answered, but not with a success.
    #[error(transparent)]
    Response(#[from] ClassifiedError),

    /// The token endpoint answered 200 with an unusable body.
    #[error("bearer token request failed: {0}")]
    Token(String),
}

impl ClientError {
    /// The rate-limit error, if this is one.
    pub fn as_rate_limit(&self) -> Option<&birdwire_core::RateLimitError> {
        match self {
            ClientError::Response(ClassifiedError::RateLimited(e)) => Some(e),
            _ => None,
        }
    }
}

/// A successful response: its decoded body plus the headers it came with.
#[derive(Debug, Clone)]
pub struct Payload {
    pub status: u16,
    pub headers: Headers,
    /// `None` for 204 and empty bodies.
    pub body: Option<Value>,
}

impl Payload {
    /// Decoded body, [`Value::Null`] when there was none.
    pub fn value(&self) -> &Value {
        self.body.as_ref().unwrap_or(&NULL)
    }

    pub fn into_value(self) -> Value {
        self.body.unwrap_or(Value::Null)
    }
}

impl RateLimitResponse for Payload {
    fn has_rate_limit(&self) -> bool {
        self.headers.has_rate_limit()
    }

    fn rate_limit_window(&self) -> RateLimitWindow {
        self.headers.rate_limit_window()
    }

    fn has_media_rate_limit(&self) -> bool {
        self.headers.has_media_rate_limit()
    }

    fn media_rate_limit_window(&self) -> RateLimitWindow {
        self.headers.media_rate_limit_window()
    }
}

/// Typed HTTP client for the Twitter REST API.
///
/// With user credentials every request is signed with OAuth 1.0a. Without
/// them the client works in app-only mode: the first request fetches a
/// bearer token (see [`Client::fetch_app_token`]) which is then shared by all
/// clones of this client.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    upload_base_url: Url,
    consumer: ConsumerCredentials,
    user: Option<OAuth1Signer>,
    app_token: Arc<RwLock<Option<BearerToken>>>,
}

impl Client {
    /// Create a new `Client`.
    ///
    /// * `config` - host, proxy, TLS and timeout settings.
    /// * `consumer` - the application's key pair.
    /// * `user` - access token pair; `None` selects app-only auth.
    pub fn new(
        config: &ClientConfig,
        consumer: ConsumerCredentials,
        user: Option<UserCredentials>,
    ) -> Result<Self, ClientError> {
        let user = user.map(|user| OAuth1Signer::new(consumer.clone(), user));
        Ok(Self {
            http: config.build_http_client()?,
            base_url: config.base_url()?,
            upload_base_url: config.upload_base_url()?,
            consumer,
            user,
            app_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Replace the `reqwest::Client` built from the config.
    ///
    /// Keep automatic decompression off on the replacement, or gzip bodies
    /// will be unwrapped twice.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Root of the media upload endpoints.
    pub fn upload_base_url(&self) -> &Url {
        &self.upload_base_url
    }

    /// Whether requests are signed as a user rather than as the app.
    pub fn is_user_context(&self) -> bool {
        self.user.is_some()
    }

    /// Absolute URL of an API path such as `1.1/statuses/show.json`.
    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// `GET` an API path with query parameters.
    pub async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Payload, ClientError> {
        self.send(Method::GET, path, query, &[]).await
    }

    /// `POST` an API path with a form-encoded body.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<Payload, ClientError> {
        self.send(Method::POST, path, &[], form).await
    }

    /// Sign, send and classify one request.
    ///
    /// `target` is an API path joined onto the base URL, or an absolute
    /// `http(s)://` URL used as is.
    pub async fn send(
        &self,
        method: Method,
        target: &str,
        query: &[(String, String)],
        form: &[(String, String)],
    ) -> Result<Payload, ClientError> {
        let url = self.target_url(target, query)?;
        let authorization = self.authorization(method.as_str(), &url, form).await?;

        debug!(%method, %url, "sending request");
        let mut request = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, authorization);
        if !form.is_empty() {
            request = request.form(form);
        }
        execute(request).await
    }

    /// Sign and send a caller-built body with its content type.
    ///
    /// Only `target` and `query` enter the signature; body parameters of
    /// anything other than a url-encoded form are never signed.
    pub async fn send_body(
        &self,
        method: Method,
        target: &str,
        query: &[(String, String)],
        body: impl Into<reqwest::Body>,
        content_type: &str,
    ) -> Result<Payload, ClientError> {
        let url = self.target_url(target, query)?;
        let authorization = self.authorization(method.as_str(), &url, &[]).await?;

        debug!(%method, %url, content_type, "sending request with body");
        let request = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, content_type)
            .body(body);
        execute(request).await
    }

    /// `POST` a `multipart/form-data` body. Signed like [`Client::send_body`].
    pub async fn send_multipart(
        &self,
        target: &str,
        query: &[(String, String)],
        form: reqwest::multipart::Form,
    ) -> Result<Payload, ClientError> {
        let url = self.target_url(target, query)?;
        let authorization = self.authorization("POST", &url, &[]).await?;

        debug!(%url, boundary = form.boundary(), "sending multipart request");
        let request = self
            .http
            .post(url)
            .header(AUTHORIZATION, authorization)
            .multipart(form);
        execute(request).await
    }

    fn target_url(&self, target: &str, query: &[(String, String)]) -> Result<Url, ClientError> {
        let mut url = if target.starts_with("http://") || target.starts_with("https://") {
            Url::parse(target)?
        } else {
            self.endpoint(target)?
        };
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn authorization(
        &self,
        method: &str,
        url: &Url,
        form: &[(String, String)],
    ) -> Result<String, ClientError> {
        let request = SigningRequest { method, url, form };
        if let Some(signer) = &self.user {
            return Ok(signer.authorization(&request)?);
        }
        let token = self.bearer_token().await?;
        Ok(token.authorization(&request)?)
    }

    /// The shared bearer token, fetched on first use.
    ///
    /// The write lock is held across the fetch so concurrent first calls
    /// wait for one token request instead of each sending their own.
    async fn bearer_token(&self) -> Result<BearerToken, ClientError> {
        if let Some(token) = self.app_token.read().await.as_ref() {
            return Ok(token.clone());
        }
        let mut slot = self.app_token.write().await;
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }
        let token = self.request_app_token().await?;
        *slot = Some(token.clone());
        Ok(token)
    }
}

/// Send `request`, drain its body and classify it.
async fn execute(request: reqwest::RequestBuilder) -> Result<Payload, ClientError> {
    let resp = request.send().await?;
    let status = resp.status().as_u16();
    let headers = convert_headers(resp.headers());
    let body = resp.bytes().await?;
    debug!(status, bytes = body.len(), "response received");

    match ApiResponse::new(status, headers.clone(), body.reader()).parse() {
        Ok(body) => Ok(Payload {
            status,
            headers,
            body,
        }),
        Err(err) => {
            match &err {
                ClassifiedError::RateLimited(limit) => {
                    warn!(
                        limit = limit.window.limit,
                        reset = %limit.window.reset,
                        "rate limited"
                    );
                }
                other => debug!(status, error = %other, "request failed"),
            }
            Err(err.into())
        }
    }
}

fn convert_headers(map: &reqwest::header::HeaderMap) -> Headers {
    map.iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

/// Render optional parameters, skipping the unset ones.
fn push_param(params: &mut Vec<(String, String)>, name: &str, value: Option<impl ToString>) {
    if let Some(value) = value {
        params.push((name.to_string(), value.to_string()));
    }
}
