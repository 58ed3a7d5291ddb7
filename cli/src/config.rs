use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};

use crate::errors::{CalendarError, CalendarResult};

const APP_DIR_NAME: &str = "calendar-cli";

/// Immutable runtime configuration, loaded once at startup and passed by reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Sent as the User-Agent on live requests
    pub application_name: String,
    /// Root of the Calendar v3 REST API
    pub api_base_url: String,
    /// OAuth scope requested during consent
    pub scope: String,
    /// Google OAuth client JSON ("installed" or "web" application)
    pub client_secret_path: PathBuf,
    /// Directory holding cached tokens, one file per user
    pub token_cache_dir: PathBuf,
    /// Key under which the token is cached
    pub user: String,
    /// Fixed loopback port for the consent redirect
    pub callback_port: u16,
    /// Upper bound on the wait for the browser redirect
    pub auth_timeout_secs: u64,
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME);

        Self {
            application_name: "calendar-cli".to_string(),
            api_base_url: "https://www.googleapis.com/calendar/v3".to_string(),
            scope: "https://www.googleapis.com/auth/calendar.readonly".to_string(),
            client_secret_path: config_dir().join("credentials.json"),
            token_cache_dir: data_dir.join("tokens"),
            user: "user".to_string(),
            callback_port: 8888,
            auth_timeout_secs: 300,
        }
    }
}

impl AppConfig {
    /// Load configuration from an explicit path, or from the default location when it exists.
    ///
    /// An explicit path that cannot be read is an error; a missing default file is not.
    pub async fn load(explicit_path: Option<&Path>) -> CalendarResult<Self> {
        match explicit_path {
            Some(path) => Self::load_from(path).await,
            None => {
                let path = Self::get_config_path();
                if path.exists() {
                    Self::load_from(&path).await
                } else {
                    debug!("No config file at {:?}, using defaults", path);
                    Ok(Self::default())
                }
            }
        }
    }

    async fn load_from(path: &Path) -> CalendarResult<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| CalendarError::file_system("read config", path, e))?;
        let config = Self::from_toml_str(&content)?;
        info!("Configuration loaded from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> CalendarResult<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CalendarResult<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(CalendarError::Config {
                message: "api_base_url must not be empty".to_string(),
            });
        }
        if self.user.trim().is_empty() {
            return Err(CalendarError::Config {
                message: "user must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn get_config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }

    /// Base URL without a trailing slash, ready for path concatenation
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/Callback", self.callback_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str("callback_port = 9999\n").unwrap();
        assert_eq!(config.callback_port, 9999);
        assert_eq!(config.user, "user");
        assert_eq!(config.auth_timeout_secs, 300);
        assert_eq!(config.api_base_url, "https://www.googleapis.com/calendar/v3");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let err = AppConfig::from_toml_str("api_base_url = \"  \"\n").unwrap_err();
        assert!(matches!(err, CalendarError::Config { .. }));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = AppConfig::from_toml_str("callback_port = \"not a port\"").unwrap_err();
        assert!(matches!(err, CalendarError::Parsing { .. }));
    }

    #[test]
    fn test_api_base_strips_trailing_slash() {
        let config = AppConfig {
            api_base_url: "http://127.0.0.1:1234/calendar/v3/".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.api_base(), "http://127.0.0.1:1234/calendar/v3");
        assert_eq!(config.redirect_uri(), "http://localhost:8888/Callback");
    }

    #[tokio::test]
    async fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "user = \"alice\"\nauth_timeout_secs = 30").unwrap();

        let config = AppConfig::load(Some(file.path())).await.unwrap();
        assert_eq!(config.user, "alice");
        assert_eq!(config.auth_timeout(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = AppConfig::load(Some(missing.as_path())).await.unwrap_err();
        assert!(matches!(err, CalendarError::FileSystem { .. }));
    }
}
