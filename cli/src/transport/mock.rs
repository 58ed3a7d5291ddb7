use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use super::{FixtureRouter, Transport, TransportResponse};
use crate::errors::CalendarResult;

/// Network-free transport answering every request from the fixture router
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    router: FixtureRouter,
}

impl MockTransport {
    pub fn new(router: FixtureRouter) -> Self {
        Self { router }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, method: Method, url: &str) -> CalendarResult<TransportResponse> {
        debug!("Mock {} {}", method, url);

        Ok(TransportResponse {
            status: 200,
            content_type: "application/json".to_string(),
            body: self.router.route(&method, url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_response_is_json_200() {
        let transport = MockTransport::default();

        for (method, url) in [
            (Method::GET, "https://www.googleapis.com/calendar/v3/users/me/calendarList"),
            (Method::GET, "https://www.googleapis.com/calendar/v3/calendars/primary/events"),
            (Method::DELETE, "https://www.googleapis.com/calendar/v3/calendars/primary"),
            (Method::GET, "not even a url"),
        ] {
            let response = transport.send(method, url).await.unwrap();
            assert_eq!(response.status, 200);
            assert_eq!(response.content_type, "application/json");
            assert!(serde_json::from_str::<serde_json::Value>(&response.body).is_ok());
        }
    }
}
