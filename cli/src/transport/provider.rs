use tracing::{debug, info};

use super::{CalendarTransport, FixtureRouter, LiveTransport, MockTransport, TransportMode};
use crate::auth;
use crate::config::AppConfig;
use crate::errors::CalendarResult;

/// Build the transport for `mode`. Live mode runs the authorization flow exactly once.
pub async fn create_transport(mode: TransportMode, config: &AppConfig) -> CalendarResult<CalendarTransport> {
    let transport = match mode {
        TransportMode::Live => {
            let credential = auth::authorize(config, &config.scope).await?;
            CalendarTransport::Live(LiveTransport::new(credential, &config.application_name)?)
        }
        TransportMode::Mock => {
            debug!("Serving fixtures as {}-mock", config.application_name);
            CalendarTransport::Mock(MockTransport::new(FixtureRouter::default()))
        }
    };
    info!("Using {:?} transport", transport.mode());
    Ok(transport)
}
