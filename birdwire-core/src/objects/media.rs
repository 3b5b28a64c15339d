//! Media attached to tweets, and upload responses.

use std::borrow::Cow;

use super::conversions::{i32_value, i64_value, indices_value, map_value, string_value, u64_id_value};

map_view! {
    /// A photo, video or GIF attached to a tweet.
    Media
}

impl<'a> Media<'a> {
    pub fn id(&self) -> u64 {
        u64_id_value(self.0, "id")
    }

    pub fn id_str(&self) -> Cow<'a, str> {
        string_value(self.0, "id_str")
    }

    pub fn media_url_https(&self) -> Cow<'a, str> {
        string_value(self.0, "media_url_https")
    }

    pub fn url(&self) -> Cow<'a, str> {
        string_value(self.0, "url")
    }

    pub fn display_url(&self) -> Cow<'a, str> {
        string_value(self.0, "display_url")
    }

    pub fn expanded_url(&self) -> Cow<'a, str> {
        string_value(self.0, "expanded_url")
    }

    /// `photo`, `video` or `animated_gif`.
    pub fn media_type(&self) -> Cow<'a, str> {
        string_value(self.0, "type")
    }

    pub fn indices(&self) -> (i64, i64) {
        indices_value(self.0, "indices")
    }
}

map_view! {
    /// Response of a media upload (`media/upload`).
    MediaResponse
}

impl<'a> MediaResponse<'a> {
    pub fn media_id(&self) -> u64 {
        u64_id_value(self.0, "media_id")
    }

    pub fn media_id_string(&self) -> Cow<'a, str> {
        string_value(self.0, "media_id_string")
    }

    /// Uploaded size in bytes.
    pub fn size(&self) -> i64 {
        i64_value(self.0, "size")
    }

    /// Seconds until the upload must be attached to a tweet.
    pub fn expires_after_secs(&self) -> i32 {
        i32_value(self.0, "expires_after_secs")
    }

    pub fn video(&self) -> VideoUpload<'a> {
        VideoUpload::from_map(map_value(self.0, "video"))
    }
}

map_view! {
    VideoUpload
}

impl<'a> VideoUpload<'a> {
    /// Container MIME type, e.g. `video/mp4`.
    pub fn video_type(&self) -> Cow<'a, str> {
        string_value(self.0, "video_type")
    }
}
