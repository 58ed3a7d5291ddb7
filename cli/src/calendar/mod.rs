pub mod client;
pub mod models;
pub mod query;

pub use client::CalendarClient;
pub use models::{CalendarList, CalendarListItem, DateOrDateTime, Event, EventTime, Events};
pub use query::{EventWindowQuery, TimeWindow};
