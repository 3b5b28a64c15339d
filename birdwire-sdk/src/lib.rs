#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(unsafe_code)]

//! Client side of the birdwire Twitter toolkit.
//!
//! * [`signature`] builds `Authorization` headers: OAuth 1.0a HMAC-SHA1 for
//!   user context, bearer tokens for app-only context.
//! * [`config`] holds the credentials and transport settings.
//! * [`client`] (feature `client`, on by default) signs, sends and
//!   classifies requests with `reqwest`.
//!
//! Decoding and classification live in `birdwire-core`, re-exported here so
//! most callers need a single dependency.

pub mod config;
pub mod signature;

#[cfg(feature = "client")]
pub mod client;

pub use birdwire_core::{decoder, objects, response, value};
pub use birdwire_core::{
    ApiResponse, ClassifiedError, DecodeError, ErrorList, Headers, RateLimitError,
    RateLimitResponse, Value,
};
