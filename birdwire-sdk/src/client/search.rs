//! Search endpoint.

use birdwire_core::objects::QueryParams;

use super::{API_PREFIX, Client, ClientError, Payload, push_param};

impl Client {
    /// `GET 1.1/search/tweets.json`: first page of results for `query`.
    ///
    /// Decode with [`birdwire_core::objects::SearchResults`]; its
    /// `next_query` feeds [`Client::search_page`].
    pub async fn search(
        &self,
        query: &str,
        count: Option<u32>,
        extended: bool,
    ) -> Result<Payload, ClientError> {
        let mut params = vec![("q".to_string(), query.to_string())];
        push_param(&mut params, "count", count);
        if extended {
            params.push(("tweet_mode".to_string(), "extended".to_string()));
        }
        self.search_page(&params).await
    }

    /// `GET 1.1/search/tweets.json` with raw parameters, typically the
    /// decoded `next_results` cursor of a previous page.
    pub async fn search_page(&self, params: &QueryParams) -> Result<Payload, ClientError> {
        self.get(&format!("{API_PREFIX}search/tweets.json"), params)
            .await
    }
}
