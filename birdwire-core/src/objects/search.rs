//! Search results and their pagination cursor.

use url::form_urlencoded;

use super::AccessError;
use super::conversions::{array_value, map_value};
use super::tweet::Tweet;
use crate::value::{Map, Value};

/// Decoded query-string pairs, in wire order.
pub type QueryParams = Vec<(String, String)>;

map_view! {
    /// Response of `search/tweets`.
    SearchResults
}

impl<'a> SearchResults<'a> {
    pub fn statuses(&self) -> Vec<Tweet<'a>> {
        super::views(array_value(self.0, "statuses"), Tweet::from_map)
    }

    pub fn search_metadata(&self) -> &'a Map {
        map_value(self.0, "search_metadata")
    }

    /// Query parameters for the next page, decoded from
    /// `search_metadata.next_results` (`?max_id=...&q=...`).
    ///
    /// Feed them back into the next search request as-is.
    pub fn next_query(&self) -> Result<QueryParams, AccessError> {
        let cursor = match self.search_metadata().get("next_results") {
            Some(Value::String(s)) => s,
            _ => return Err(AccessError::MissingPaginationCursor),
        };
        let query = cursor.strip_prefix('?').unwrap_or(cursor);
        let params: QueryParams = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        if params.is_empty() {
            return Err(AccessError::BadPaginationCursor(cursor.clone()));
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode;

    #[test]
    fn test_next_query() {
        let value = decode(
            br#"{"statuses":[{"id_str":"250075927172759552"}],
                "search_metadata":{"next_results":"?max_id=249279667666817023&q=%23freebandnames&count=4&include_entities=1"}}"#,
        )
        .unwrap();
        let results = SearchResults::from_value(&value).unwrap();
        assert_eq!(results.statuses().len(), 1);
        assert_eq!(
            results.next_query().unwrap(),
            vec![
                ("max_id".to_string(), "249279667666817023".to_string()),
                ("q".to_string(), "#freebandnames".to_string()),
                ("count".to_string(), "4".to_string()),
                ("include_entities".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_last_page_has_no_cursor() {
        let value = decode(br#"{"statuses":[],"search_metadata":{"count":15}}"#).unwrap();
        let results = SearchResults::from_value(&value).unwrap();
        assert_eq!(
            results.next_query(),
            Err(AccessError::MissingPaginationCursor)
        );

        let wrong_type = decode(br#"{"search_metadata":{"next_results":12}}"#).unwrap();
        assert_eq!(
            SearchResults::from_value(&wrong_type).unwrap().next_query(),
            Err(AccessError::MissingPaginationCursor)
        );
    }

    #[test]
    fn test_empty_cursor_is_rejected() {
        let value = decode(br#"{"search_metadata":{"next_results":"?"}}"#).unwrap();
        assert_eq!(
            SearchResults::from_value(&value).unwrap().next_query(),
            Err(AccessError::BadPaginationCursor("?".to_string()))
        );
    }
}
