#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

//! Transport-agnostic building blocks of the birdwire Twitter client:
//! a single-pass JSON [`decoder`], the dynamic [`value`] tree it produces,
//! typed [`objects`] views over that tree, and the [`response`] classifier
//! that turns raw HTTP responses into values or typed errors.

pub mod decoder;
pub mod objects;
pub mod response;
pub mod value;

pub use decoder::{DecodeError, decode, decode_str};
pub use objects::{AccessError, ErrorList, FieldError};
pub use response::{
    ApiResponse, ClassifiedError, Headers, RateLimitError, RateLimitResponse, RateLimitWindow,
    ResponseError,
};
pub use value::{Map, Number, Value};
