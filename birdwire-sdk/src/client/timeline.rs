//! Timeline endpoints.

use super::{API_PREFIX, Client, ClientError, Payload, push_param};

/// Parameters shared by the timeline endpoints. Unset fields are left out
/// of the request.
#[derive(Debug, Clone, Default)]
pub struct TimelineQuery {
    pub screen_name: Option<String>,
    pub user_id: Option<u64>,
    /// Tweets per page; the API caps it at 200.
    pub count: Option<u32>,
    pub since_id: Option<u64>,
    pub max_id: Option<u64>,
    pub exclude_replies: Option<bool>,
    pub include_rts: Option<bool>,
    pub trim_user: Option<bool>,
    /// Ask for untruncated `full_text` (`tweet_mode=extended`).
    pub extended: bool,
}

impl TimelineQuery {
    pub fn for_screen_name(screen_name: impl Into<String>) -> Self {
        Self {
            screen_name: Some(screen_name.into()),
            ..Self::default()
        }
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push_param(&mut params, "screen_name", self.screen_name.as_deref());
        push_param(&mut params, "user_id", self.user_id);
        push_param(&mut params, "count", self.count);
        push_param(&mut params, "since_id", self.since_id);
        push_param(&mut params, "max_id", self.max_id);
        push_param(&mut params, "exclude_replies", self.exclude_replies);
        push_param(&mut params, "include_rts", self.include_rts);
        push_param(&mut params, "trim_user", self.trim_user);
        if self.extended {
            params.push(("tweet_mode".to_string(), "extended".to_string()));
        }
        params
    }
}

impl Client {
    /// `GET 1.1/statuses/user_timeline.json`: tweets posted by one user.
    ///
    /// Read the result with [`birdwire_core::objects::timeline`].
    pub async fn user_timeline(&self, query: &TimelineQuery) -> Result<Payload, ClientError> {
        self.get(
            &format!("{API_PREFIX}statuses/user_timeline.json"),
            &query.to_params(),
        )
        .await
    }

    /// `GET 1.1/statuses/home_timeline.json`: the authenticating user's home
    /// timeline. Needs user credentials.
    pub async fn home_timeline(&self, query: &TimelineQuery) -> Result<Payload, ClientError> {
        self.get(
            &format!("{API_PREFIX}statuses/home_timeline.json"),
            &query.to_params(),
        )
        .await
    }

    /// `GET 1.1/statuses/show.json`: a single tweet.
    pub async fn show_status(&self, id: u64, extended: bool) -> Result<Payload, ClientError> {
        let mut params = vec![("id".to_string(), id.to_string())];
        if extended {
            params.push(("tweet_mode".to_string(), "extended".to_string()));
        }
        self.get(&format!("{API_PREFIX}statuses/show.json"), &params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_fields_are_skipped() {
        let query = TimelineQuery {
            count: Some(5),
            include_rts: Some(false),
            extended: true,
            ..TimelineQuery::for_screen_name("jack")
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("screen_name".to_string(), "jack".to_string()),
                ("count".to_string(), "5".to_string()),
                ("include_rts".to_string(), "false".to_string()),
                ("tweet_mode".to_string(), "extended".to_string()),
            ]
        );
        assert!(TimelineQuery::default().to_params().is_empty());
    }
}
