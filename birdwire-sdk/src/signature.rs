//! Request signing for the Twitter REST API.
//!
//! Two schemes produce the `Authorization` header:
//!
//! * **User context**: OAuth 1.0a (RFC 5849) with HMAC-SHA1. The signature
//!   covers the method, the normalized URL, the query string and any
//!   form-encoded body parameters:
//!
//!   ```text
//!   Authorization: OAuth oauth_consumer_key="…", oauth_nonce="…",
//!       oauth_signature="…", oauth_signature_method="HMAC-SHA1",
//!       oauth_timestamp="…", oauth_token="…", oauth_version="1.0"
//!   ```
//!
//! * **App-only context**: `Authorization: Bearer {token}`, with the token
//!   obtained from `POST /oauth2/token` using
//!   `Authorization: Basic base64({key}:{secret})`.
//!
//! Percent-encoding follows RFC 3986 throughout: only `A-Z a-z 0-9 - . _ ~`
//! are left as is.

use std::borrow::Cow;

use rand::Rng;
use rand::distr::Alphanumeric;
use url::Url;

use crate::config::{ConsumerCredentials, UserCredentials};

/// Header name carrying the signature or token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

pub const OAUTH_SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const OAUTH_VERSION: &str = "1.0";

/// Length of generated nonces.
pub const NONCE_LENGTH: usize = 32;

/// Errors produced by signature operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("url cannot be signed: {0}")]
    InvalidUrl(String),
    #[error("no bearer token available")]
    MissingToken,
    #[error("invalid authorization header")]
    InvalidHeader,
}

/// The parts of an outgoing request a signature covers.
#[derive(Debug, Clone, Copy)]
pub struct SigningRequest<'a> {
    /// Upper-case HTTP method.
    pub method: &'a str,
    /// Full URL, query string included.
    pub url: &'a Url,
    /// `application/x-www-form-urlencoded` body parameters, if any.
    pub form: &'a [(String, String)],
}

/// Produces an `Authorization` header value for a request.
pub trait Signer {
    fn authorization(&self, request: &SigningRequest<'_>) -> Result<String, SignatureError>;
}

// ---------------------------------------------------------------------------
// OAuth 1.0a
// ---------------------------------------------------------------------------

/// OAuth 1.0a HMAC-SHA1 signer for user-context requests.
#[derive(Debug, Clone)]
pub struct OAuth1Signer {
    consumer: ConsumerCredentials,
    user: UserCredentials,
}

impl OAuth1Signer {
    pub fn new(consumer: ConsumerCredentials, user: UserCredentials) -> Self {
        Self { consumer, user }
    }

    /// Sign with a caller-chosen nonce and timestamp.
    ///
    /// [`Signer::authorization`] draws both fresh; this entry point exists so
    /// signatures can be reproduced.
    pub fn authorization_with(
        &self,
        request: &SigningRequest<'_>,
        nonce: &str,
        timestamp: i64,
    ) -> Result<String, SignatureError> {
        let timestamp = timestamp.to_string();
        let mut oauth_params = vec![
            ("oauth_consumer_key", self.consumer.key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", OAUTH_SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.user.token.as_str()),
            ("oauth_version", OAUTH_VERSION),
        ];

        let mut all_params: Vec<(Cow<'_, str>, Cow<'_, str>)> = oauth_params
            .iter()
            .map(|(k, v)| (Cow::Borrowed(*k), Cow::Borrowed(*v)))
            .collect();
        all_params.extend(request.url.query_pairs());
        all_params.extend(
            request
                .form
                .iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), Cow::Borrowed(v.as_str()))),
        );

        let base = signature_base_string(request.method, request.url, &all_params)?;
        let signature = hmac_sha1_signature(&base, &self.consumer.secret, &self.user.secret);

        oauth_params.push(("oauth_signature", signature.as_str()));
        Ok(format_authorization_header(&oauth_params))
    }
}

impl Signer for OAuth1Signer {
    fn authorization(&self, request: &SigningRequest<'_>) -> Result<String, SignatureError> {
        let nonce = generate_nonce();
        let timestamp = time::OffsetDateTime::now_utc().unix_timestamp();
        self.authorization_with(request, &nonce, timestamp)
    }
}

/// RFC 3986 percent-encoding.
pub fn percent_encode(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Scheme, host, non-default port and path, lower-casing what RFC 5849
/// §3.4.1.2 asks for. Query and fragment are dropped.
pub fn normalized_url(url: &Url) -> Result<String, SignatureError> {
    let host = url
        .host_str()
        .ok_or_else(|| SignatureError::InvalidUrl(url.to_string()))?;
    let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
    Ok(format!(
        "{}://{}{}{}",
        url.scheme().to_ascii_lowercase(),
        host.to_ascii_lowercase(),
        port,
        url.path()
    ))
}

/// `METHOD&enc(url)&enc(params)`, with parameters encoded then sorted by
/// name and value.
pub fn signature_base_string<K: AsRef<str>, V: AsRef<str>>(
    method: &str,
    url: &Url,
    params: &[(K, V)],
) -> Result<String, SignatureError> {
    let mut encoded: Vec<(Cow<'_, str>, Cow<'_, str>)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k.as_ref()), percent_encode(v.as_ref())))
        .collect();
    encoded.sort();
    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    Ok(format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(&normalized_url(url)?),
        percent_encode(&param_string)
    ))
}

/// Base64 HMAC-SHA1 of `base` keyed by `enc(consumer_secret)&enc(token_secret)`.
pub fn hmac_sha1_signature(base: &str, consumer_secret: &str, token_secret: &str) -> String {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let tag = ring::hmac::sign(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, key.as_bytes()),
        base.as_bytes(),
    );
    fast32::base64::RFC4648.encode(tag.as_ref())
}

/// Random alphanumeric nonce.
pub fn generate_nonce() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Header parsing / formatting
// ---------------------------------------------------------------------------

/// Format `OAuth k="v", …` from raw (unencoded) parameters, sorted by name.
pub fn format_authorization_header(params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(Cow<'_, str>, Cow<'_, str>)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();
    let fields = encoded
        .iter()
        .map(|(k, v)| format!("{k}=\"{v}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {fields}")
}

/// Parse an `OAuth k="v", …` header back into decoded pairs, in header order.
pub fn parse_authorization_header(value: &str) -> Result<Vec<(String, String)>, SignatureError> {
    let fields = value
        .strip_prefix("OAuth ")
        .ok_or(SignatureError::InvalidHeader)?;
    fields
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(|field| {
            let (key, quoted) = field.split_once('=').ok_or(SignatureError::InvalidHeader)?;
            let raw = quoted
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .ok_or(SignatureError::InvalidHeader)?;
            let decoded = urlencoding::decode(raw).map_err(|_| SignatureError::InvalidHeader)?;
            Ok((key.to_string(), decoded.into_owned()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// App-only auth
// ---------------------------------------------------------------------------

/// App-only access token.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    access_token: String,
}

impl BearerToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

impl Signer for BearerToken {
    fn authorization(&self, _request: &SigningRequest<'_>) -> Result<String, SignatureError> {
        if self.access_token.is_empty() {
            return Err(SignatureError::MissingToken);
        }
        Ok(format!("Bearer {}", self.access_token))
    }
}

/// `Basic base64(enc(key):enc(secret))`, the credentials of a token request.
pub fn basic_credentials(consumer: &ConsumerCredentials) -> String {
    let pair = format!(
        "{}:{}",
        percent_encode(&consumer.key),
        percent_encode(&consumer.secret)
    );
    format!("Basic {}", fast32::base64::RFC4648.encode(pair.as_bytes()))
}
