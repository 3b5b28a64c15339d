//! App-only bearer tokens.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::info;

use birdwire_core::objects::conversions::string_value;

use super::{Client, ClientError, execute};
use crate::signature::{BearerToken, basic_credentials};

/// Token endpoint, relative to the API root.
pub const TOKEN_PATH: &str = "oauth2/token";

const TOKEN_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";
const TOKEN_GRANT: &str = "grant_type=client_credentials";

impl Client {
    /// `POST /oauth2/token`: exchange the consumer key pair for an app-only
    /// bearer token.
    ///
    /// The token is stored and used by every later request of this client
    /// (and its clones) that has no user credentials.
    pub async fn fetch_app_token(&self) -> Result<BearerToken, ClientError> {
        let token = self.request_app_token().await?;
        *self.app_token.write().await = Some(token.clone());
        Ok(token)
    }

    /// Ask the token endpoint for a bearer token without storing it.
    #[tracing::instrument(skip_all, err, name = "API:FetchAppToken")]
    pub(super) async fn request_app_token(&self) -> Result<BearerToken, ClientError> {
        let url = self.endpoint(TOKEN_PATH)?;
        let request = self
            .http
            .post(url)
            .header(AUTHORIZATION, basic_credentials(&self.consumer))
            .header(CONTENT_TYPE, TOKEN_CONTENT_TYPE)
            .body(TOKEN_GRANT);
        let payload = execute(request).await?;

        let map = payload
            .value()
            .as_map()
            .ok_or_else(|| ClientError::Token("response is not an object".to_string()))?;
        let token_type = string_value(map, "token_type");
        if !token_type.eq_ignore_ascii_case("bearer") {
            return Err(ClientError::Token(format!(
                "unexpected token type {token_type:?}"
            )));
        }
        let access_token = string_value(map, "access_token");
        if access_token.is_empty() {
            return Err(ClientError::Token("response has no access_token".to_string()));
        }

        info!("fetched app-only bearer token");
        Ok(BearerToken::new(access_token.into_owned()))
    }

    /// Reuse a previously fetched token instead of requesting a new one.
    pub async fn set_app_token(&self, token: BearerToken) {
        *self.app_token.write().await = Some(token);
    }

    /// The stored bearer token, if one was fetched or set.
    pub async fn app_token(&self) -> Option<BearerToken> {
        self.app_token.read().await.clone()
    }
}
