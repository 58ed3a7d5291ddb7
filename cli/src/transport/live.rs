use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use tracing::{debug, warn};

use super::{Transport, TransportResponse};
use crate::auth::Credential;
use crate::errors::{CalendarError, CalendarResult};

/// Real HTTPS transport that signs every request with the bearer credential
pub struct LiveTransport {
    http_client: reqwest::Client,
    credential: Credential,
}

impl LiveTransport {
    pub fn new(credential: Credential, application_name: &str) -> CalendarResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(application_name.to_string())
            .build()?;

        Ok(Self {
            http_client,
            credential,
        })
    }
}

#[async_trait]
impl Transport for LiveTransport {
    async fn send(&self, method: Method, url: &str) -> CalendarResult<TransportResponse> {
        debug!("{} {}", method, url);

        let response = self
            .http_client
            .request(method, url)
            .bearer_auth(self.credential.secret())
            .send()
            .await
            .map_err(|e| CalendarError::Network {
                message: format!("Google Calendar API request failed: {}", e),
            })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Google Calendar API error: {} - {}", status, body);
        }

        Ok(TransportResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
