//! Classification of raw HTTP responses into decoded values or typed errors.
//!
//! [`ApiResponse`] is transport-agnostic: it takes a status code, the
//! response headers and any [`Read`] over the body. The SDK feeds it the
//! bytes it got from `reqwest`; tests feed it byte slices.
//!
//! | status                         | outcome                                   |
//! |--------------------------------|-------------------------------------------|
//! | 200, 201, 202                  | decoded body, `None` when the body is empty |
//! | 204                            | `None`, body drained unread               |
//! | 429                            | [`RateLimitError`] built from headers      |
//! | anything else                  | [`ErrorList`] if the body is one, else [`ResponseError`] |

use std::fmt;
use std::io::{self, Read};

use flate2::read::GzDecoder;
use time::OffsetDateTime;

use crate::decoder::{self, DecodeError};
use crate::objects::ErrorList;
use crate::value::Value;

// ----- Header names -----

pub const RATE_LIMIT_HEADER: &str = "X-Rate-Limit-Limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "X-Rate-Limit-Remaining";
pub const RATE_LIMIT_RESET_HEADER: &str = "X-Rate-Limit-Reset";
pub const MEDIA_RATE_LIMIT_HEADER: &str = "X-MediaRateLimit-Limit";
pub const MEDIA_RATE_LIMIT_REMAINING_HEADER: &str = "X-MediaRateLimit-Remaining";
pub const MEDIA_RATE_LIMIT_RESET_HEADER: &str = "X-MediaRateLimit-Reset";
pub const CONTENT_ENCODING_HEADER: &str = "Content-Encoding";

// ----- Status codes -----

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_ACCEPTED: u16 = 202;
pub const STATUS_NO_CONTENT: u16 = 204;
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

// ----- Headers -----

/// Response headers as received: ordered, repeatable, and looked up
/// case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header, keeping earlier values with the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).next()
    }

    pub fn get_all<'s>(&'s self, name: &str) -> impl Iterator<Item = &'s str> {
        self.0
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether `name` is present with a non-empty value.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn u32_or_zero(&self, name: &str) -> u32 {
        self.get(name)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    fn epoch_or_unix_epoch(&self, name: &str) -> OffsetDateTime {
        self.get(name)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
            .unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        )
    }
}

// ----- Rate limits -----

/// One rate-limit window as reported by response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitWindow {
    /// Requests allowed per window.
    pub limit: u32,
    /// Requests left in the current window.
    pub remaining: u32,
    /// When the window resets.
    pub reset: OffsetDateTime,
}

impl Default for RateLimitWindow {
    fn default() -> Self {
        Self {
            limit: 0,
            remaining: 0,
            reset: OffsetDateTime::UNIX_EPOCH,
        }
    }
}

impl RateLimitWindow {
    fn from_headers(headers: &Headers, limit: &str, remaining: &str, reset: &str) -> Self {
        Self {
            limit: headers.u32_or_zero(limit),
            remaining: headers.u32_or_zero(remaining),
            reset: headers.epoch_or_unix_epoch(reset),
        }
    }
}

/// Rate-limit side data carried by a response or a rate-limit error.
///
/// Missing or unparsable numbers read as `0` and a missing reset reads as the
/// Unix epoch; use the `has_*` methods to tell "absent" from "zero".
pub trait RateLimitResponse {
    fn has_rate_limit(&self) -> bool;
    fn rate_limit_window(&self) -> RateLimitWindow;
    fn has_media_rate_limit(&self) -> bool;
    fn media_rate_limit_window(&self) -> RateLimitWindow;

    fn rate_limit(&self) -> u32 {
        self.rate_limit_window().limit
    }

    fn rate_limit_remaining(&self) -> u32 {
        self.rate_limit_window().remaining
    }

    fn rate_limit_reset(&self) -> OffsetDateTime {
        self.rate_limit_window().reset
    }

    fn media_rate_limit(&self) -> u32 {
        self.media_rate_limit_window().limit
    }

    fn media_rate_limit_remaining(&self) -> u32 {
        self.media_rate_limit_window().remaining
    }

    fn media_rate_limit_reset(&self) -> OffsetDateTime {
        self.media_rate_limit_window().reset
    }
}

impl RateLimitResponse for Headers {
    fn has_rate_limit(&self) -> bool {
        self.contains(RATE_LIMIT_HEADER)
    }

    fn rate_limit_window(&self) -> RateLimitWindow {
        RateLimitWindow::from_headers(
            self,
            RATE_LIMIT_HEADER,
            RATE_LIMIT_REMAINING_HEADER,
            RATE_LIMIT_RESET_HEADER,
        )
    }

    fn has_media_rate_limit(&self) -> bool {
        self.contains(MEDIA_RATE_LIMIT_HEADER)
    }

    fn media_rate_limit_window(&self) -> RateLimitWindow {
        RateLimitWindow::from_headers(
            self,
            MEDIA_RATE_LIMIT_HEADER,
            MEDIA_RATE_LIMIT_REMAINING_HEADER,
            MEDIA_RATE_LIMIT_RESET_HEADER,
        )
    }
}

// ----- Errors -----

/// A 429 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitError {
    pub window: RateLimitWindow,
    /// Media upload window, when the response reported one.
    pub media: Option<RateLimitWindow>,
}

impl RateLimitError {
    pub fn from_headers(headers: &Headers) -> Self {
        Self {
            window: headers.rate_limit_window(),
            media: headers
                .has_media_rate_limit()
                .then(|| headers.media_rate_limit_window()),
        }
    }
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rate limit: {}, remaining: {}, reset: {}",
            self.window.limit, self.window.remaining, self.window.reset
        )
    }
}

impl std::error::Error for RateLimitError {}

impl RateLimitResponse for RateLimitError {
    fn has_rate_limit(&self) -> bool {
        true
    }

    fn rate_limit_window(&self) -> RateLimitWindow {
        self.window
    }

    fn has_media_rate_limit(&self) -> bool {
        self.media.is_some()
    }

    fn media_rate_limit_window(&self) -> RateLimitWindow {
        self.media.unwrap_or_default()
    }
}

/// A failure response whose body is not a structured error list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unable to handle response (status code {status}): `{body}`")]
pub struct ResponseError {
    pub status: u16,
    /// Body text, lossily decoded as UTF-8.
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifiedError {
    #[error("api error: {0}")]
    Api(ErrorList),
    #[error(transparent)]
    RateLimited(RateLimitError),
    #[error(transparent)]
    Response(ResponseError),
    #[error("failed to read response body: {0}")]
    Transport(#[from] io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ClassifiedError {
    /// HTTP status behind the error, when there is one to report.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClassifiedError::RateLimited(_) => Some(STATUS_TOO_MANY_REQUESTS),
            ClassifiedError::Response(e) => Some(e.status),
            _ => None,
        }
    }
}

// ----- Classification -----

/// A raw API response awaiting classification.
pub struct ApiResponse<B> {
    status: u16,
    headers: Headers,
    body: B,
}

impl<B: Read> ApiResponse<B> {
    pub fn new(status: u16, headers: Headers, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Whether `Content-Encoding` mentions gzip.
    pub fn is_gzipped(&self) -> bool {
        self.headers
            .get(CONTENT_ENCODING_HEADER)
            .is_some_and(|v| v.to_ascii_lowercase().contains("gzip"))
    }

    /// Classify the response, consuming its body.
    ///
    /// `Ok(None)` means success without a payload (204, or an empty body on
    /// 200/201/202).
    pub fn parse(self) -> Result<Option<Value>, ClassifiedError> {
        match self.status {
            STATUS_NO_CONTENT => {
                // Never parsed; a failing drain is not worth reporting.
                let _ = self.read_bytes();
                Ok(None)
            }
            STATUS_TOO_MANY_REQUESTS => {
                let error = RateLimitError::from_headers(&self.headers);
                self.read_bytes()?;
                Err(ClassifiedError::RateLimited(error))
            }
            STATUS_OK | STATUS_CREATED | STATUS_ACCEPTED => {
                let body = self.read_bytes()?;
                if body.iter().all(u8::is_ascii_whitespace) {
                    return Ok(None);
                }
                Ok(Some(decoder::decode(&body)?))
            }
            status => {
                let body = self.read_bytes()?;
                Err(classify_failure(status, &body))
            }
        }
    }

    /// Body as text (lossy UTF-8), decompressed when needed. Status is not
    /// inspected.
    pub fn read_body(self) -> Result<String, ClassifiedError> {
        let body = self.read_bytes()?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Read the body to EOF, then gunzip it when the response is
    /// compressed. An empty body stays empty whatever its encoding.
    fn read_bytes(self) -> io::Result<Vec<u8>> {
        let gzipped = self.is_gzipped();
        let mut raw = Vec::new();
        let mut body = self.body;
        body.read_to_end(&mut raw)?;
        if !gzipped || raw.is_empty() {
            return Ok(raw);
        }
        let mut out = Vec::new();
        GzDecoder::new(raw.as_slice()).read_to_end(&mut out)?;
        Ok(out)
    }
}

impl<B: Read> RateLimitResponse for ApiResponse<B> {
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

impl<B> fmt::Debug for ApiResponse<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

fn classify_failure(status: u16, body: &[u8]) -> ClassifiedError {
    match decoder::decode(body)
        .ok()
        .and_then(|value| ErrorList::from_value(&value))
    {
        Some(errors) => ClassifiedError::Api(errors),
        None => ClassifiedError::Response(ResponseError {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> Headers {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let h = headers(&[("x-rate-limit-limit", "15"), ("X-RATE-LIMIT-LIMIT", "99")]);
        assert_eq!(h.get(RATE_LIMIT_HEADER), Some("15"));
        assert_eq!(h.get_all(RATE_LIMIT_HEADER).count(), 2);
        assert!(h.get("Content-Type").is_none());
    }

    #[test]
    fn test_missing_rate_limit_reads_as_zero() {
        let response = ApiResponse::new(200, Headers::new(), &b""[..]);
        assert!(!response.has_rate_limit());
        assert_eq!(response.rate_limit(), 0);
        assert_eq!(response.rate_limit_reset(), OffsetDateTime::UNIX_EPOCH);
        assert!(!response.has_media_rate_limit());
    }

    #[test]
    fn test_unparsable_rate_limit_is_present_but_zero() {
        let h = headers(&[(RATE_LIMIT_HEADER, "lots"), (RATE_LIMIT_RESET_HEADER, "soon")]);
        assert!(h.has_rate_limit());
        assert_eq!(h.rate_limit(), 0);
        assert_eq!(h.rate_limit_reset(), OffsetDateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_media_window_only_when_reported() {
        let plain = RateLimitError::from_headers(&headers(&[(RATE_LIMIT_HEADER, "15")]));
        assert!(plain.media.is_none());
        assert!(plain.has_rate_limit());

        let media = RateLimitError::from_headers(&headers(&[
            (MEDIA_RATE_LIMIT_HEADER, "30"),
            (MEDIA_RATE_LIMIT_REMAINING_HEADER, "29"),
        ]));
        assert!(media.has_media_rate_limit());
        assert_eq!(media.media_rate_limit(), 30);
        assert_eq!(media.media_rate_limit_remaining(), 29);
    }

    #[test]
    fn test_whitespace_body_is_no_content() {
        let response = ApiResponse::new(200, Headers::new(), &b" \r\n\t"[..]);
        assert!(response.parse().unwrap().is_none());
    }

    #[test]
    fn test_status_of_error() {
        let err = classify_failure(500, b"<html>oops</html>");
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("status code 500"));
    }
}
