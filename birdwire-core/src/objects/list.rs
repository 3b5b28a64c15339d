//! Lists and cursored list pages.

use std::borrow::Cow;

use super::conversions::{array_value, i64_value, map_value, string_value, u64_id_value};
use super::user::User;
use crate::value::Value;

map_view! {
    /// A curated list of accounts.
    List
}

impl<'a> List<'a> {
    pub fn id(&self) -> u64 {
        u64_id_value(self.0, "id")
    }

    pub fn id_str(&self) -> Cow<'a, str> {
        string_value(self.0, "id_str")
    }

    /// Owner of the list.
    pub fn user(&self) -> User<'a> {
        User::from_map(map_value(self.0, "user"))
    }

    /// `public` or `private`.
    pub fn mode(&self) -> Cow<'a, str> {
        string_value(self.0, "mode")
    }

    pub fn name(&self) -> Cow<'a, str> {
        string_value(self.0, "name")
    }

    pub fn slug(&self) -> Cow<'a, str> {
        string_value(self.0, "slug")
    }

    /// `@owner/slug`.
    pub fn full_name(&self) -> Cow<'a, str> {
        string_value(self.0, "full_name")
    }

    pub fn description(&self) -> Cow<'a, str> {
        string_value(self.0, "description")
    }

    pub fn uri(&self) -> Cow<'a, str> {
        string_value(self.0, "uri")
    }

    pub fn subscriber_count(&self) -> i64 {
        i64_value(self.0, "subscriber_count")
    }

    pub fn member_count(&self) -> i64 {
        i64_value(self.0, "member_count")
    }
}

map_view! {
    /// One page of a cursored list collection (`lists/ownerships`,
    /// `lists/subscriptions`, `lists/memberships`).
    CursoredLists
}

impl<'a> CursoredLists<'a> {
    pub fn next_cursor_str(&self) -> Cow<'a, str> {
        string_value(self.0, "next_cursor_str")
    }

    pub fn previous_cursor_str(&self) -> Cow<'a, str> {
        string_value(self.0, "previous_cursor_str")
    }

    /// Cursor of the next page; `0` means this is the last page.
    pub fn next_cursor(&self) -> u64 {
        u64_id_value(self.0, "next_cursor")
    }

    /// Cursor of the previous page; `0` means this is the first page.
    pub fn previous_cursor(&self) -> u64 {
        u64_id_value(self.0, "previous_cursor")
    }

    pub fn lists(&self) -> Vec<List<'a>> {
        super::views(array_value(self.0, "lists"), List::from_map)
    }
}

/// Lists of an uncursored response (`lists/list`, a top-level array).
pub fn lists(value: &Value) -> Vec<List<'_>> {
    value
        .as_array()
        .map(|items| super::views(items, List::from_map))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode;

    #[test]
    fn test_cursored_page() {
        let value = decode(
            br#"{"next_cursor":1516837838944119498,"next_cursor_str":"1516837838944119498",
                "previous_cursor":0,"previous_cursor_str":"0",
                "lists":[{"id_str":"574","name":"team","slug":"team","full_name":"@twitterapi/team",
                          "mode":"public","member_count":43,"subscriber_count":1,"user":{"screen_name":"twitterapi"}}]}"#,
        )
        .unwrap();
        let page = CursoredLists::from_value(&value).unwrap();
        assert_eq!(page.next_cursor(), 1516837838944119498);
        assert_eq!(page.next_cursor_str(), "1516837838944119498");
        assert_eq!(page.previous_cursor(), 0);

        let lists = page.lists();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].id(), 574);
        assert_eq!(lists[0].full_name(), "@twitterapi/team");
        assert_eq!(lists[0].member_count(), 43);
        assert_eq!(lists[0].user().screen_name(), "twitterapi");
    }

    #[test]
    fn test_uncursored_lists() {
        let value = decode(br#"[{"slug":"a"},"junk",{"slug":"b"}]"#).unwrap();
        let slugs: Vec<String> = lists(&value).iter().map(|l| l.slug().into_owned()).collect();
        assert_eq!(slugs, vec!["a", "b"]);
    }
}
