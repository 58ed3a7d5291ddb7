use calendar_cli::auth::Credential;
use calendar_cli::calendar::{CalendarClient, DateOrDateTime, EventWindowQuery};
use calendar_cli::errors::CalendarError;
use calendar_cli::transport::{CalendarTransport, LiveTransport, TransportMode};
use mockito::Matcher;

fn live_transport(token: &str) -> CalendarTransport {
    CalendarTransport::Live(LiveTransport::new(Credential::new(token), "calendar-cli").unwrap())
}

#[tokio::test]
async fn lists_events_from_live_api() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/calendar/v3/calendars/team%40example.com/events")
        .match_header("authorization", "Bearer live-token")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("singleEvents".into(), "true".into()),
            Matcher::UrlEncoded("orderBy".into(), "startTime".into()),
            Matcher::UrlEncoded(
                "fields".into(),
                "items(id,summary,start,end),nextPageToken".into(),
            ),
            Matcher::Regex("timeMin=".into()),
            Matcher::Regex("timeMax=".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json; charset=UTF-8")
        .with_body(
            r#"{
              "items": [
                {
                  "id": "abc123_20250818T090000Z",
                  "summary": "Planning",
                  "start": { "dateTime": "2025-08-18T21:00:00+12:00", "timeZone": "Pacific/Auckland" },
                  "end": { "dateTime": "2025-08-18T21:30:00+12:00", "timeZone": "Pacific/Auckland" }
                }
              ]
            }"#,
        )
        .create_async()
        .await;

    let transport = live_transport("live-token");
    assert_eq!(transport.mode(), TransportMode::Live);

    let base = format!("{}/calendar/v3", server.url());
    let client = CalendarClient::new(&transport, base);
    let events = client
        .list_events(&EventWindowQuery::from_now("team@example.com", 7).unwrap())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(events.items.len(), 1);
    let event = &events.items[0];
    assert_eq!(event.summary.as_deref(), Some("Planning"));
    assert_eq!(event.start.time_zone.as_deref(), Some("Pacific/Auckland"));
    match event.start.value {
        DateOrDateTime::DateTime(dt) => assert_eq!(dt.to_rfc3339(), "2025-08-18T21:00:00+12:00"),
        DateOrDateTime::Date(_) => panic!("expected a timed event"),
    }
}

#[tokio::test]
async fn unauthorized_live_call_is_api_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/calendar/v3/users/me/calendarList")
        .match_query(Matcher::UrlEncoded("fields".into(), "items(id,summary)".into()))
        .with_status(401)
        .with_body(r#"{"error":{"code":401,"message":"Request had invalid authentication credentials."}}"#)
        .expect(1)
        .create_async()
        .await;

    let transport = live_transport("revoked");
    let client = CalendarClient::new(&transport, format!("{}/calendar/v3", server.url()));
    let err = client.list_calendars().await.unwrap_err();

    // One attempt, no retry
    mock.assert_async().await;
    match err {
        CalendarError::Api { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("invalid authentication credentials"));
        }
        other => panic!("expected api error, got {:?}", other),
    }
}
