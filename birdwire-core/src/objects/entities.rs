//! Entities extracted from tweet text: hashtags, links, mentions and media.

use std::borrow::Cow;

use super::conversions::{array_value, indices_value, string_value, u64_id_value};
use super::media::Media;

map_view! {
    /// The `entities` (or `extended_entities`) object of a tweet.
    Entities
}

impl<'a> Entities<'a> {
    pub fn hashtags(&self) -> Vec<Hashtag<'a>> {
        super::views(array_value(self.0, "hashtags"), Hashtag::from_map)
    }

    pub fn urls(&self) -> Vec<UrlEntity<'a>> {
        super::views(array_value(self.0, "urls"), UrlEntity::from_map)
    }

    pub fn user_mentions(&self) -> Vec<UserMention<'a>> {
        super::views(array_value(self.0, "user_mentions"), UserMention::from_map)
    }

    pub fn media(&self) -> Vec<Media<'a>> {
        super::views(array_value(self.0, "media"), Media::from_map)
    }
}

map_view! {
    Hashtag
}

impl<'a> Hashtag<'a> {
    /// Tag text without the leading `#`.
    pub fn text(&self) -> Cow<'a, str> {
        string_value(self.0, "text")
    }

    pub fn indices(&self) -> (i64, i64) {
        indices_value(self.0, "indices")
    }
}

map_view! {
    /// A link, as shortened (`url`) and as the author wrote it.
    UrlEntity
}

impl<'a> UrlEntity<'a> {
    pub fn url(&self) -> Cow<'a, str> {
        string_value(self.0, "url")
    }

    pub fn expanded_url(&self) -> Cow<'a, str> {
        string_value(self.0, "expanded_url")
    }

    pub fn display_url(&self) -> Cow<'a, str> {
        string_value(self.0, "display_url")
    }

    pub fn indices(&self) -> (i64, i64) {
        indices_value(self.0, "indices")
    }
}

map_view! {
    UserMention
}

impl<'a> UserMention<'a> {
    pub fn id(&self) -> u64 {
        u64_id_value(self.0, "id")
    }

    pub fn id_str(&self) -> Cow<'a, str> {
        string_value(self.0, "id_str")
    }

    pub fn screen_name(&self) -> Cow<'a, str> {
        string_value(self.0, "screen_name")
    }

    pub fn name(&self) -> Cow<'a, str> {
        string_value(self.0, "name")
    }

    pub fn indices(&self) -> (i64, i64) {
        indices_value(self.0, "indices")
    }
}
