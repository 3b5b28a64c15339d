//! Tweets and timelines.

use std::borrow::Cow;

use time::OffsetDateTime;

use super::conversions::{
    bool_value, i64_value, map_value, string_value, time_value, u64_id_value,
};
use super::entities::Entities;
use super::user::User;
use crate::value::Value;

map_view! {
    /// A tweet (a "status" in the API's own vocabulary).
    Tweet
}

impl<'a> Tweet<'a> {
    pub fn id(&self) -> u64 {
        u64_id_value(self.0, "id")
    }

    pub fn id_str(&self) -> Cow<'a, str> {
        string_value(self.0, "id_str")
    }

    /// Compatibility-mode text, possibly truncated to 140 characters.
    pub fn text(&self) -> Cow<'a, str> {
        string_value(self.0, "text")
    }

    /// Untruncated text, only sent when the request asked for
    /// `tweet_mode=extended`.
    pub fn full_text(&self) -> Cow<'a, str> {
        string_value(self.0, "full_text")
    }

    /// `full_text` when the payload carries it, `text` otherwise.
    pub fn display_text(&self) -> Cow<'a, str> {
        match self.0.get("full_text") {
            Some(Value::String(s)) => Cow::Borrowed(s),
            _ => self.text(),
        }
    }

    /// Author. An empty view if the payload was trimmed (`trim_user`).
    pub fn user(&self) -> User<'a> {
        User::from_map(map_value(self.0, "user"))
    }

    /// BCP 47 language tag detected by the API (`lang`).
    pub fn language(&self) -> Cow<'a, str> {
        string_value(self.0, "lang")
    }

    pub fn created_at(&self) -> OffsetDateTime {
        time_value(self.0, "created_at")
    }

    /// Posting client, as an HTML anchor.
    pub fn source(&self) -> Cow<'a, str> {
        string_value(self.0, "source")
    }

    pub fn truncated(&self) -> bool {
        bool_value(self.0, "truncated")
    }

    pub fn retweet_count(&self) -> i64 {
        i64_value(self.0, "retweet_count")
    }

    pub fn favorite_count(&self) -> i64 {
        i64_value(self.0, "favorite_count")
    }

    pub fn favorited(&self) -> bool {
        bool_value(self.0, "favorited")
    }

    pub fn retweeted(&self) -> bool {
        bool_value(self.0, "retweeted")
    }

    pub fn in_reply_to_status_id_str(&self) -> Cow<'a, str> {
        string_value(self.0, "in_reply_to_status_id_str")
    }

    pub fn in_reply_to_screen_name(&self) -> Cow<'a, str> {
        string_value(self.0, "in_reply_to_screen_name")
    }

    /// The original tweet when this one is a retweet.
    pub fn retweeted_status(&self) -> Option<Tweet<'a>> {
        self.0.get("retweeted_status").and_then(Tweet::from_value)
    }

    pub fn entities(&self) -> Entities<'a> {
        Entities::from_map(map_value(self.0, "entities"))
    }

    /// Native media attachments. Only present when the tweet has media.
    pub fn extended_entities(&self) -> Entities<'a> {
        Entities::from_map(map_value(self.0, "extended_entities"))
    }
}

/// Tweets of a timeline response (a top-level array). Anything that is not
/// an array gives an empty timeline; non-map elements are skipped.
pub fn timeline(value: &Value) -> Vec<Tweet<'_>> {
    value
        .as_array()
        .map(|items| super::views(items, Tweet::from_map))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode;

    #[test]
    fn test_retweet_nesting() {
        let value = decode(
            br#"{"id_str":"2","text":"RT @a: hi","retweeted_status":{"id_str":"1","text":"hi","user":{"screen_name":"a"}}}"#,
        )
        .unwrap();
        let tweet = Tweet::from_value(&value).unwrap();
        let original = tweet.retweeted_status().unwrap();
        assert_eq!(original.id(), 1);
        assert_eq!(original.user().screen_name(), "a");
        assert!(original.retweeted_status().is_none());
    }

    #[test]
    fn test_display_text_prefers_full_text() {
        let compat = decode(br#"{"text":"short"}"#).unwrap();
        assert_eq!(Tweet::from_value(&compat).unwrap().display_text(), "short");

        let extended = decode(br#"{"text":"short","full_text":"the whole thing"}"#).unwrap();
        assert_eq!(
            Tweet::from_value(&extended).unwrap().display_text(),
            "the whole thing"
        );
    }

    #[test]
    fn test_timeline_skips_non_maps() {
        let value = decode(br#"[{"id_str":"1"},7,null,{"id_str":"2"}]"#).unwrap();
        let ids: Vec<u64> = timeline(&value).iter().map(Tweet::id).collect();
        assert_eq!(ids, vec![1, 2]);

        let not_array = decode(br#"{"id_str":"1"}"#).unwrap();
        assert!(timeline(&not_array).is_empty());
    }

    #[test]
    fn test_missing_user_is_empty_view() {
        let value = decode(br#"{"id_str":"1"}"#).unwrap();
        let user = Tweet::from_value(&value).unwrap().user();
        assert!(user.as_map().is_empty());
        assert_eq!(user.id(), 0);
    }
}
