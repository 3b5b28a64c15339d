//! Transport settings.

use std::time::Duration;

use url::Url;

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "api.twitter.com";

/// Host serving media uploads.
pub const DEFAULT_UPLOAD_HOST: &str = "upload.twitter.com";

pub const DEFAULT_USER_AGENT: &str = concat!("birdwire/", env!("CARGO_PKG_VERSION"));

/// How to reach the API.
///
/// Proxying and TLS verification are explicit settings; the library never
/// consults `HTTP_PROXY`-style environment variables on its own.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bare host name (`api.twitter.com`, implies HTTPS) or a full base URL
    /// (`http://127.0.0.1:8080`).
    pub host: String,
    /// Same forms as `host`, for media uploads.
    pub upload_host: String,
    /// Route every request through this proxy.
    pub proxy_url: Option<Url>,
    /// Accept any TLS certificate. Only meant for debugging proxies.
    pub insecure_skip_verify: bool,
    /// Whole-request timeout.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            upload_host: DEFAULT_UPLOAD_HOST.to_string(),
            proxy_url: None,
            insecure_skip_verify: false,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Root URL that endpoint paths are joined onto.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        root_url(&self.host)
    }

    /// Root URL of the media upload endpoints.
    pub fn upload_base_url(&self) -> Result<Url, url::ParseError> {
        root_url(&self.upload_host)
    }

    /// Build the `reqwest` client for these settings.
    ///
    /// Automatic decompression is turned off: the response classifier
    /// unwraps gzip bodies itself.
    #[cfg(feature = "client")]
    pub fn build_http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .gzip(false);
        builder = match &self.proxy_url {
            Some(proxy_url) => builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?),
            // reqwest would otherwise pick up proxy variables from the environment.
            None => builder.no_proxy(),
        };
        if self.insecure_skip_verify {
            tracing::warn!("TLS certificate verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

fn root_url(host: &str) -> Result<Url, url::ParseError> {
    if host.contains("://") {
        Url::parse(host)
    } else {
        Url::parse(&format!("https://{host}/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_host_means_https() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url().unwrap().as_str(), "https://api.twitter.com/");
    }

    #[test]
    fn test_full_url_host_is_kept() {
        let config = ClientConfig {
            host: "http://127.0.0.1:8080".to_string(),
            ..ClientConfig::default()
        };
        let base = config.base_url().unwrap();
        assert_eq!(base.scheme(), "http");
        assert_eq!(base.port(), Some(8080));
        assert_eq!(base.join("1.1/statuses/home_timeline.json").unwrap().path(), "/1.1/statuses/home_timeline.json");
    }

    #[test]
    fn test_upload_host_is_separate() {
        let config = ClientConfig {
            host: "http://127.0.0.1:8080".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(
            config.upload_base_url().unwrap().as_str(),
            "https://upload.twitter.com/"
        );
    }

    #[test]
    fn test_user_agent_names_crate() {
        assert!(ClientConfig::default().user_agent.starts_with("birdwire/"));
    }
}
