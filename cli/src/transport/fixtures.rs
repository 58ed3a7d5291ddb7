//! Canned Calendar API responses for offline runs and tests.

use reqwest::Method;
use serde_json::json;

pub const CALENDAR_LIST_FIXTURE: &str = include_str!("../../fixtures/calendar_list.json");
pub const EVENTS_FIXTURE: &str = include_str!("../../fixtures/events.json");

/// One row of the routing table: every fragment must appear in the URL
#[derive(Debug, Clone)]
pub struct MockRoute {
    pub method: Method,
    pub url_fragments: Vec<&'static str>,
    pub fixture: &'static str,
}

impl MockRoute {
    pub fn new(method: Method, url_fragments: Vec<&'static str>, fixture: &'static str) -> Self {
        Self {
            method,
            url_fragments,
            fixture,
        }
    }

    pub fn matches(&self, method: &Method, url: &str) -> bool {
        self.method == *method && self.url_fragments.iter().all(|fragment| url.contains(fragment))
    }
}

/// Ordered routing table; the first matching route wins
#[derive(Debug, Clone)]
pub struct FixtureRouter {
    routes: Vec<MockRoute>,
}

impl FixtureRouter {
    pub fn new(routes: Vec<MockRoute>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[MockRoute] {
        &self.routes
    }

    /// Resolve a request to a JSON body. Unmatched requests get the unknown-kind fallback.
    pub fn route(&self, method: &Method, url: &str) -> String {
        self.routes
            .iter()
            .find(|route| route.matches(method, url))
            .map(|route| route.fixture.to_string())
            .unwrap_or_else(|| unmatched_fixture(url))
    }
}

impl Default for FixtureRouter {
    fn default() -> Self {
        Self::new(vec![
            MockRoute::new(Method::GET, vec!["/users/me/calendarList"], CALENDAR_LIST_FIXTURE),
            MockRoute::new(Method::GET, vec!["/calendars/", "/events"], EVENTS_FIXTURE),
        ])
    }
}

fn unmatched_fixture(url: &str) -> String {
    json!({ "kind": "calendar#unknown", "url": url }).to_string()
}
