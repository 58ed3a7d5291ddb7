use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::models::{CalendarList, Events};
use super::query::{calendar_list_url, EventWindowQuery};
use crate::errors::{CalendarError, CalendarResult};
use crate::transport::Transport;

/// Calendar v3 queries issued over whichever transport the process runs with
pub struct CalendarClient<'a, T: Transport> {
    transport: &'a T,
    api_base: String,
}

impl<'a, T: Transport> CalendarClient<'a, T> {
    pub fn new(transport: &'a T, api_base: impl Into<String>) -> Self {
        Self {
            transport,
            api_base: api_base.into(),
        }
    }

    pub async fn list_calendars(&self) -> CalendarResult<CalendarList> {
        let url = calendar_list_url(&self.api_base)?;
        let list: CalendarList = self.get_json(&url, "calendar list response").await?;
        info!("Fetched {} calendars", list.items.len());
        Ok(list)
    }

    /// Fetch the first page of events in the query window
    pub async fn list_events(&self, query: &EventWindowQuery) -> CalendarResult<Events> {
        debug!(
            "Fetching events for {} from {} to {}",
            query.calendar_id, query.window.min, query.window.max
        );

        let url = query.to_url(&self.api_base)?;
        let events: Events = self.get_json(&url, "events response").await?;
        info!("Fetched {} events from calendar {}", events.items.len(), query.calendar_id);

        if events.next_page_token.is_some() {
            warn!(
                "Calendar {} has more events in this window than one page holds; only the first page is shown",
                query.calendar_id
            );
        }

        Ok(events)
    }

    async fn get_json<R: DeserializeOwned>(&self, url: &Url, context: &str) -> CalendarResult<R> {
        let response = self
            .transport
            .send(Method::GET, url.as_str())
            .await?
            .error_for_status()?;

        serde_json::from_str(&response.body).map_err(|e| CalendarError::Parsing {
            format: context.to_string(),
            message: e.to_string(),
        })
    }
}
