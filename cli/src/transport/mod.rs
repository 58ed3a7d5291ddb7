use async_trait::async_trait;
use reqwest::Method;

use crate::errors::{CalendarError, CalendarResult};

pub mod fixtures;
pub mod live;
pub mod mock;
pub mod provider;

pub use fixtures::{FixtureRouter, MockRoute};
pub use live::LiveTransport;
pub use mock::MockTransport;
pub use provider::create_transport;

/// Raw outcome of one HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into an API error carrying the body
    pub fn error_for_status(self) -> CalendarResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(CalendarError::Api {
                status: self.status,
                message: self.body,
            })
        }
    }
}

/// Capability that turns a method and URL into a status, content type and body
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, url: &str) -> CalendarResult<TransportResponse>;
}

/// Which transport the process runs with, fixed for its whole lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Live,
    Mock,
}

impl TransportMode {
    pub fn from_mock_flag(mock: bool) -> Self {
        if mock {
            TransportMode::Mock
        } else {
            TransportMode::Live
        }
    }
}

/// The two concrete transports, selected by mode
pub enum CalendarTransport {
    Live(LiveTransport),
    Mock(MockTransport),
}

impl CalendarTransport {
    pub fn mode(&self) -> TransportMode {
        match self {
            CalendarTransport::Live(_) => TransportMode::Live,
            CalendarTransport::Mock(_) => TransportMode::Mock,
        }
    }
}

#[async_trait]
impl Transport for CalendarTransport {
    async fn send(&self, method: Method, url: &str) -> CalendarResult<TransportResponse> {
        match self {
            CalendarTransport::Live(transport) => transport.send(method, url).await,
            CalendarTransport::Mock(transport) => transport.send(method, url).await,
        }
    }
}
