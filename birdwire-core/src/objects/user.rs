//! User objects.

use std::borrow::Cow;

use time::OffsetDateTime;

use super::conversions::{bool_value, i64_value, string_value, time_value, u64_id_value};

map_view! {
    /// A user account.
    User
}

impl<'a> User<'a> {
    /// Numeric ID, `0` if neither `id_str` nor `id` parses.
    pub fn id(&self) -> u64 {
        u64_id_value(self.0, "id")
    }

    pub fn id_str(&self) -> Cow<'a, str> {
        string_value(self.0, "id_str")
    }

    pub fn name(&self) -> Cow<'a, str> {
        string_value(self.0, "name")
    }

    pub fn screen_name(&self) -> Cow<'a, str> {
        string_value(self.0, "screen_name")
    }

    pub fn location(&self) -> Cow<'a, str> {
        string_value(self.0, "location")
    }

    pub fn description(&self) -> Cow<'a, str> {
        string_value(self.0, "description")
    }

    pub fn url(&self) -> Cow<'a, str> {
        string_value(self.0, "url")
    }

    pub fn lang(&self) -> Cow<'a, str> {
        string_value(self.0, "lang")
    }

    pub fn profile_image_url_https(&self) -> Cow<'a, str> {
        string_value(self.0, "profile_image_url_https")
    }

    pub fn followers_count(&self) -> i64 {
        i64_value(self.0, "followers_count")
    }

    pub fn friends_count(&self) -> i64 {
        i64_value(self.0, "friends_count")
    }

    pub fn statuses_count(&self) -> i64 {
        i64_value(self.0, "statuses_count")
    }

    pub fn favourites_count(&self) -> i64 {
        i64_value(self.0, "favourites_count")
    }

    pub fn listed_count(&self) -> i64 {
        i64_value(self.0, "listed_count")
    }

    pub fn verified(&self) -> bool {
        bool_value(self.0, "verified")
    }

    pub fn protected(&self) -> bool {
        bool_value(self.0, "protected")
    }

    /// Account creation time, Unix epoch if unparsable.
    pub fn created_at(&self) -> OffsetDateTime {
        time_value(self.0, "created_at")
    }
}
