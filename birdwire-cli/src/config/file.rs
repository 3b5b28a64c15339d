//! TOML file configuration structures.
//!
//! These structs directly map to the `birdwire.toml` file format.

use serde::Deserialize;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub client: ClientSection,
    pub credentials: CredentialsSection,
}

/// How to reach the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSection {
    /// Bare host name or a full base URL.
    #[serde(default = "default_host")]
    pub host: String,
    /// Media upload host, same forms as `host`.
    #[serde(default = "default_upload_host")]
    pub upload_host: String,
    #[serde(default)]
    pub proxy_url: Option<Url>,
    #[serde(default)]
    pub insecure_skip_verify: bool,
    /// Whole-request timeout in seconds; `0` disables it.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_host() -> String {
    birdwire_sdk::config::DEFAULT_HOST.to_string()
}

fn default_upload_host() -> String {
    birdwire_sdk::config::DEFAULT_UPLOAD_HOST.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            upload_host: default_upload_host(),
            proxy_url: None,
            insecure_skip_verify: false,
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

/// Application key pair, plus an optional user access token pair.
///
/// Leaving out the access token selects app-only auth.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsSection {
    pub consumer_key: String,
    pub consumer_secret: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub access_token_secret: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_auth_parsing() {
        let toml_str = r#"
[client]
host = "api.twitter.com"
proxy_url = "http://localhost:8888"
insecure_skip_verify = true
timeout_secs = 5

[credentials]
consumer_key = "ck"
consumer_secret = "cs"
access_token = "at"
access_token_secret = "ats"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.client.host, "api.twitter.com");
        assert_eq!(
            config.client.proxy_url.as_ref().map(Url::as_str),
            Some("http://localhost:8888/")
        );
        assert!(config.client.insecure_skip_verify);
        assert_eq!(config.client.timeout_secs, 5);
        assert_eq!(config.credentials.access_token.as_deref(), Some("at"));
        assert_eq!(config.credentials.access_token_secret.as_deref(), Some("ats"));
    }

    #[test]
    fn test_app_only_parsing() {
        let toml_str = r#"
[credentials]
consumer_key = "ck"
consumer_secret = "cs"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.client.host, "api.twitter.com");
        assert_eq!(config.client.timeout_secs, 30);
        assert!(config.client.proxy_url.is_none());
        assert!(!config.client.insecure_skip_verify);
        assert!(config.credentials.access_token.is_none());
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let toml_str = r#"
[client]
host = "api.twitter.com"
"#;
        assert!(toml::from_str::<FileConfig>(toml_str).is_err());
    }
}
