//! Calendar v3 response shapes, limited to the projected fields this client requests.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub items: Vec<CalendarListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarListItem {
    pub id: String,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Events {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub items: Vec<Event>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
}

/// Either a timestamp or a calendar date for all-day events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrDateTime {
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
}

impl DateOrDateTime {
    pub fn is_all_day(&self) -> bool {
        matches!(self, DateOrDateTime::Date(_))
    }
}

impl fmt::Display for DateOrDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateOrDateTime::DateTime(dt) => {
                write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            DateOrDateTime::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// An event boundary as the API returns it: the instant plus the optional zone name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEventTime", into = "RawEventTime")]
pub struct EventTime {
    pub value: DateOrDateTime,
    pub time_zone: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_time: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

impl TryFrom<RawEventTime> for EventTime {
    type Error = String;

    fn try_from(raw: RawEventTime) -> Result<Self, Self::Error> {
        let value = match (raw.date_time, raw.date) {
            (Some(date_time), None) => DateOrDateTime::DateTime(date_time),
            (None, Some(date)) => DateOrDateTime::Date(date),
            (Some(_), Some(_)) => {
                return Err("event time has both dateTime and date".to_string())
            }
            (None, None) => return Err("event time has neither dateTime nor date".to_string()),
        };

        Ok(Self {
            value,
            time_zone: raw.time_zone,
        })
    }
}

impl From<EventTime> for RawEventTime {
    fn from(time: EventTime) -> Self {
        let (date_time, date) = match time.value {
            DateOrDateTime::DateTime(dt) => (Some(dt), None),
            DateOrDateTime::Date(d) => (None, Some(d)),
        };
        Self {
            date_time,
            date,
            time_zone: time.time_zone,
        }
    }
}
