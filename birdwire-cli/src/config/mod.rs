//! Configuration module for the birdwire CLI.
//!
//! Reads the TOML file, applies command-line overrides and turns the result
//! into the SDK's client settings and credentials.

pub mod file;

use std::path::{Path, PathBuf};
use std::time::Duration;

use birdwire_sdk::config::{ClientConfig, ConsumerCredentials, DEFAULT_USER_AGENT, UserCredentials};
use thiserror::Error;

use crate::config::file::FileConfig;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Everything needed to build a `Client`.
#[derive(Debug)]
pub struct LoadedConfig {
    pub client: ClientConfig,
    pub consumer: ConsumerCredentials,
    /// `None` selects app-only auth.
    pub user: Option<UserCredentials>,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    host_override: Option<String>,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, host_override: Option<String>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            host_override,
        }
    }

    /// Read, override, validate and convert.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        self.load_str(&config_content)
    }

    fn load_str(&self, config_content: &str) -> Result<LoadedConfig, ConfigError> {
        let mut file_config: FileConfig = toml::from_str(config_content)?;

        if let Some(host) = &self.host_override {
            file_config.client.host = host.clone();
        }

        validate(&file_config)?;
        Ok(build_loaded_config(file_config))
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    let credentials = &config.credentials;
    if credentials.consumer_key.is_empty() || credentials.consumer_secret.is_empty() {
        return Err(ConfigError::ValidationError(
            "consumer_key and consumer_secret must not be empty".to_string(),
        ));
    }
    if credentials.access_token.is_some() != credentials.access_token_secret.is_some() {
        return Err(ConfigError::ValidationError(
            "access_token and access_token_secret must be set together".to_string(),
        ));
    }
    if config.client.host.is_empty() {
        return Err(ConfigError::ValidationError("host must not be empty".to_string()));
    }
    if config.client.upload_host.is_empty() {
        return Err(ConfigError::ValidationError(
            "upload_host must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    let client = file_config.client;
    let credentials = file_config.credentials;
    let user = match (credentials.access_token, credentials.access_token_secret) {
        (Some(token), Some(secret)) => Some(UserCredentials::new(token, secret)),
        _ => None,
    };

    LoadedConfig {
        client: ClientConfig {
            host: client.host,
            upload_host: client.upload_host,
            proxy_url: client.proxy_url,
            insecure_skip_verify: client.insecure_skip_verify,
            timeout: (client.timeout_secs > 0).then(|| Duration::from_secs(client.timeout_secs)),
            user_agent: client
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        },
        consumer: ConsumerCredentials::new(credentials.consumer_key, credentials.consumer_secret),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP_ONLY: &str = r#"
[credentials]
consumer_key = "ck"
consumer_secret = "cs"
"#;

    #[test]
    fn test_app_only_has_no_user() {
        let loaded = ConfigLoader::new("unused.toml", None).load_str(APP_ONLY).unwrap();
        assert!(loaded.user.is_none());
        assert_eq!(loaded.consumer, ConsumerCredentials::new("ck", "cs"));
        assert_eq!(loaded.client.timeout, Some(Duration::from_secs(30)));
        assert_eq!(loaded.client.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_user_credentials_and_host_override() {
        let content = r#"
[client]
timeout_secs = 0
user_agent = "custom/1.0"

[credentials]
consumer_key = "ck"
consumer_secret = "cs"
access_token = "at"
access_token_secret = "ats"
"#;
        let loader = ConfigLoader::new("unused.toml", Some("http://127.0.0.1:9000".to_string()));
        let loaded = loader.load_str(content).unwrap();
        assert_eq!(loaded.user, Some(UserCredentials::new("at", "ats")));
        assert_eq!(loaded.client.host, "http://127.0.0.1:9000");
        assert_eq!(loaded.client.timeout, None);
        assert_eq!(loaded.client.user_agent, "custom/1.0");
    }

    #[test]
    fn test_half_user_credentials_rejected() {
        let content = r#"
[credentials]
consumer_key = "ck"
consumer_secret = "cs"
access_token = "at"
"#;
        let err = ConfigLoader::new("unused.toml", None).load_str(content).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::new("/nonexistent/birdwire.toml", None).load().unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
