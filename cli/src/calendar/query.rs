use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::Url;

use crate::errors::{CalendarError, CalendarResult};

/// Projection for the calendar-list request
pub const CALENDAR_LIST_FIELDS: &str = "items(id,summary)";
/// Projection for the event-list request
pub const EVENT_FIELDS: &str = "items(id,summary,start,end),nextPageToken";

/// The `[min, max]` interval bounding an event query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub min: DateTime<Utc>,
    pub max: DateTime<Utc>,
}

impl TimeWindow {
    /// Window of `days` calendar days starting at `now`.
    ///
    /// Fails with a validation error when the end falls past the last representable instant.
    pub fn starting_at(now: DateTime<Utc>, days: u32) -> CalendarResult<Self> {
        let max = now
            .checked_add_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| CalendarError::Validation {
                field: "--days".to_string(),
                message: format!("{} days from {} is beyond the supported date range", days, now),
            })?;
        Ok(Self { min: now, max })
    }

    pub fn span(&self) -> Duration {
        self.max - self.min
    }
}

/// A single-page, time-bounded, start-ordered event listing for one calendar
#[derive(Debug, Clone, PartialEq)]
pub struct EventWindowQuery {
    pub calendar_id: String,
    pub window: TimeWindow,
}

impl EventWindowQuery {
    pub fn new(calendar_id: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            window,
        }
    }

    /// Query covering the next `days` days from the wall clock
    pub fn from_now(calendar_id: impl Into<String>, days: u32) -> CalendarResult<Self> {
        Ok(Self::new(calendar_id, TimeWindow::starting_at(Utc::now(), days)?))
    }

    pub fn to_url(&self, api_base: &str) -> CalendarResult<Url> {
        let endpoint = format!(
            "{}/calendars/{}/events",
            api_base,
            urlencoding::encode(&self.calendar_id)
        );
        let time_min = self.window.min.to_rfc3339_opts(SecondsFormat::Millis, true);
        let time_max = self.window.max.to_rfc3339_opts(SecondsFormat::Millis, true);

        Url::parse_with_params(
            &endpoint,
            &[
                ("timeMin", time_min.as_str()),
                ("timeMax", time_max.as_str()),
                // Expand recurring events into concrete instances
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
                ("fields", EVENT_FIELDS),
            ],
        )
        .map_err(|e| url_error(&endpoint, e))
    }
}

pub fn calendar_list_url(api_base: &str) -> CalendarResult<Url> {
    let endpoint = format!("{}/users/me/calendarList", api_base);
    Url::parse_with_params(&endpoint, &[("fields", CALENDAR_LIST_FIELDS)])
        .map_err(|e| url_error(&endpoint, e))
}

fn url_error(endpoint: &str, error: impl std::fmt::Display) -> CalendarError {
    CalendarError::Parsing {
        format: "URL".to_string(),
        message: format!("{}: {}", endpoint, error),
    }
}
