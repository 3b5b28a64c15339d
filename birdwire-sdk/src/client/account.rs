//! Account, rate-limit and posting endpoints.

use super::{API_PREFIX, Client, ClientError, Payload, push_param};

impl Client {
    /// `GET 1.1/account/verify_credentials.json`: the authenticating user.
    /// Needs user credentials.
    pub async fn verify_credentials(&self) -> Result<Payload, ClientError> {
        self.get(
            &format!("{API_PREFIX}account/verify_credentials.json"),
            &[],
        )
        .await
    }

    /// `GET 1.1/application/rate_limit_status.json`: current windows for the
    /// given resource families (`statuses`, `search`, …), or all of them when
    /// `resources` is empty.
    pub async fn rate_limit_status(&self, resources: &[&str]) -> Result<Payload, ClientError> {
        let mut params = Vec::new();
        if !resources.is_empty() {
            params.push(("resources".to_string(), resources.join(",")));
        }
        self.get(
            &format!("{API_PREFIX}application/rate_limit_status.json"),
            &params,
        )
        .await
    }

    /// `POST 1.1/statuses/update.json`: post a tweet. Needs user
    /// credentials.
    pub async fn update_status(
        &self,
        status: &str,
        in_reply_to_status_id: Option<u64>,
    ) -> Result<Payload, ClientError> {
        let mut form = vec![("status".to_string(), status.to_string())];
        push_param(&mut form, "in_reply_to_status_id", in_reply_to_status_id);
        self.post_form(&format!("{API_PREFIX}statuses/update.json"), &form)
            .await
    }
}
