//! Configuration types for the birdwire client.
//!
//! These are validated runtime values. Reading them from a file or the
//! environment is left to the application (see the `birdwire` CLI).

mod client;
mod credentials;

pub use client::{ClientConfig, DEFAULT_HOST, DEFAULT_UPLOAD_HOST, DEFAULT_USER_AGENT};
pub use credentials::{ConsumerCredentials, UserCredentials};
