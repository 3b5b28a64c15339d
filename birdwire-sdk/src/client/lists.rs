//! List endpoints.

use super::{API_PREFIX, Client, ClientError, Payload, push_param};

impl Client {
    /// `GET 1.1/lists/ownerships.json`: one page of the lists a user owns.
    ///
    /// `screen_name` defaults to the authenticating user. Pass the previous
    /// page's `next_cursor` to continue; decode with
    /// [`birdwire_core::objects::CursoredLists`].
    pub async fn list_ownerships(
        &self,
        screen_name: Option<&str>,
        cursor: Option<u64>,
        count: Option<u32>,
    ) -> Result<Payload, ClientError> {
        let mut params = Vec::new();
        push_param(&mut params, "screen_name", screen_name);
        push_param(&mut params, "cursor", cursor);
        push_param(&mut params, "count", count);
        self.get(&format!("{API_PREFIX}lists/ownerships.json"), &params)
            .await
    }

    /// `GET 1.1/lists/list.json`: every list a user owns or subscribes to,
    /// uncursored. Decode with [`birdwire_core::objects::lists`].
    pub async fn lists(&self, screen_name: Option<&str>) -> Result<Payload, ClientError> {
        let mut params = Vec::new();
        push_param(&mut params, "screen_name", screen_name);
        self.get(&format!("{API_PREFIX}lists/list.json"), &params)
            .await
    }

    /// `GET 1.1/lists/statuses.json`: the timeline of a list.
    pub async fn list_statuses(
        &self,
        list_id: u64,
        count: Option<u32>,
    ) -> Result<Payload, ClientError> {
        let mut params = vec![("list_id".to_string(), list_id.to_string())];
        push_param(&mut params, "count", count);
        self.get(&format!("{API_PREFIX}lists/statuses.json"), &params)
            .await
    }
}
