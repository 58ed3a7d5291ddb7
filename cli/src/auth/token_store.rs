use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::errors::{CalendarError, CalendarResult};

/// Tokens refresh this long before they actually expire
const EXPIRY_MARGIN_MINUTES: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub scopes: Vec<String>,
}

impl StoredToken {
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now + Duration::minutes(EXPIRY_MARGIN_MINUTES) >= expires_at,
            // No expiry means it's likely a long-lived token
            None => false,
        }
    }

    pub fn covers_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

/// On-disk token cache, one JSON file per user
pub struct TokenStore {
    token_file_path: PathBuf,
}

impl TokenStore {
    pub fn new(cache_dir: &Path, user: &str) -> Self {
        Self {
            token_file_path: cache_dir.join(format!("{}.json", user)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.token_file_path
    }

    /// Missing cache is `None`; a cache that exists but cannot be parsed is an error.
    pub async fn load(&self) -> CalendarResult<Option<StoredToken>> {
        if !self.token_file_path.exists() {
            debug!("No cached token at {:?}", self.token_file_path);
            return Ok(None);
        }

        let token_data = fs::read_to_string(&self.token_file_path)
            .await
            .map_err(|e| CalendarError::file_system("read token cache", &self.token_file_path, e))?;
        let token: StoredToken = serde_json::from_str(&token_data).map_err(|e| {
            CalendarError::authorization(format!(
                "token cache {:?} is malformed: {}",
                self.token_file_path, e
            ))
        })?;
        Ok(Some(token))
    }

    pub async fn store(&self, token: &StoredToken) -> CalendarResult<()> {
        if let Some(parent) = self.token_file_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CalendarError::file_system("create token cache dir", parent, e))?;
        }

        let token_json = serde_json::to_string_pretty(token)?;
        fs::write(&self.token_file_path, token_json)
            .await
            .map_err(|e| CalendarError::file_system("write token cache", &self.token_file_path, e))?;
        debug!("Stored token to {:?}", self.token_file_path);
        Ok(())
    }
}
