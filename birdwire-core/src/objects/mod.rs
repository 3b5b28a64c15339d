//! Typed, read-only views over decoded API payloads.
//!
//! A view is a borrowed `&Map` with named accessors; it owns nothing and
//! cannot outlive the [`Value`] it was taken from. Accessors never fail:
//! each one documents the zero value it falls back to when a field is
//! missing or has an unexpected type (see [`conversions`]).
//!
//! ```
//! use birdwire_core::decoder::decode;
//! use birdwire_core::objects::Tweet;
//!
//! let value = decode(br#"{"id_str":"20","text":"just setting up my twttr","user":{"screen_name":"jack"}}"#).unwrap();
//! let tweet = Tweet::from_value(&value).unwrap();
//! assert_eq!(tweet.id(), 20);
//! assert_eq!(tweet.user().screen_name(), "jack");
//! assert_eq!(tweet.retweet_count(), 0);
//! ```

use crate::value::{Map, Value};

/// Declares a view struct over a borrowed [`Map`] with the shared
/// constructors and a pass-through `Serialize` impl.
macro_rules! map_view {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name<'a>(&'a $crate::value::Map);

        impl<'a> $name<'a> {
            pub fn from_map(map: &'a $crate::value::Map) -> Self {
                Self(map)
            }

            /// `None` unless `value` is a map.
            pub fn from_value(value: &'a $crate::value::Value) -> Option<Self> {
                value.as_map().map(Self)
            }

            /// The backing map, for fields without a dedicated accessor.
            pub fn as_map(&self) -> &'a $crate::value::Map {
                self.0
            }
        }

        impl serde::Serialize for $name<'_> {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serde::Serialize::serialize(self.0, serializer)
            }
        }
    };
}

pub mod conversions;
pub mod entities;
pub mod errors;
pub mod list;
pub mod media;
pub mod search;
pub mod tweet;
pub mod user;

pub use entities::{Entities, Hashtag, UrlEntity, UserMention};
pub use errors::{ErrorList, FieldError};
pub use list::{CursoredLists, List, lists};
pub use media::{Media, MediaResponse, VideoUpload};
pub use search::{QueryParams, SearchResults};
pub use tweet::{Tweet, timeline};
pub use user::User;

/// Failures of the few accessors that cannot fall back to a zero value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// `search_metadata.next_results` is absent or not a string: there is no
    /// next page.
    #[error("search metadata has no next_results cursor")]
    MissingPaginationCursor,
    /// The cursor is present but holds no query parameters.
    #[error("pagination cursor {0:?} has no query parameters")]
    BadPaginationCursor(String),
}

/// Wrap every map element of `values` in a view, skipping anything else.
fn views<'a, T>(values: &'a [Value], wrap: fn(&'a Map) -> T) -> Vec<T> {
    values.iter().filter_map(Value::as_map).map(wrap).collect()
}
