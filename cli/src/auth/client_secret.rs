use serde::Deserialize;
use std::path::Path;
use tokio::fs;

use crate::errors::{CalendarError, CalendarResult};

/// OAuth client registration as downloaded from the Google Cloud console
#[derive(Debug, Clone, Deserialize)]
pub struct InstalledAppSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Deserialize)]
struct ClientSecretFile {
    installed: Option<InstalledAppSecret>,
    web: Option<InstalledAppSecret>,
}

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl InstalledAppSecret {
    /// Read the client JSON. A missing file stops live mode before anything else runs.
    pub async fn load(path: &Path) -> CalendarResult<Self> {
        if !path.exists() {
            return Err(CalendarError::MissingClientSecret {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| CalendarError::file_system("read client secret", path, e))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> CalendarResult<Self> {
        let file: ClientSecretFile = serde_json::from_str(content)?;
        file.installed.or(file.web).ok_or_else(|| CalendarError::Config {
            message: "client secret JSON has neither an \"installed\" nor a \"web\" section"
                .to_string(),
        })
    }
}
