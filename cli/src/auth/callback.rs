//! Loopback listener that receives the browser redirect at the end of consent.

use reqwest::Url;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, warn};

use crate::errors::{CalendarError, CalendarResult};

const CALLBACK_PATH: &str = "/Callback";
/// Header lines read before giving up on a request
const MAX_HEADER_LINES: usize = 100;

const SUCCESS_PAGE: &str = "<!DOCTYPE html>\n<html><head><title>Authorization Complete</title></head>\
<body><h1>Authorization Successful</h1><p>You can close this window.</p></body></html>";
const FAILURE_PAGE: &str = "<!DOCTYPE html>\n<html><head><title>Authorization Failed</title></head>\
<body><h1>Authorization Failed</h1><p>Return to the terminal for details.</p></body></html>";

/// Query parameters Google appends to the redirect URI
#[derive(Debug, Default, PartialEq)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl CallbackQuery {
    /// Parse a request target such as `/Callback?code=..&state=..`.
    /// Returns `None` for any other path (favicon requests and the like).
    pub fn from_request_target(target: &str) -> Option<Self> {
        let url = Url::parse(&format!("http://localhost{}", target)).ok()?;
        if !url.path().eq_ignore_ascii_case(CALLBACK_PATH) {
            return None;
        }

        let mut query = CallbackQuery::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => query.code = Some(value.into_owned()),
                "state" => query.state = Some(value.into_owned()),
                "error" => query.error = Some(value.into_owned()),
                _ => {}
            }
        }
        Some(query)
    }

    pub fn into_code(self, expected_state: &str) -> CalendarResult<String> {
        if let Some(error) = self.error {
            return Err(CalendarError::authorization(format!(
                "consent was not granted: {}",
                error
            )));
        }
        if self.state.as_deref() != Some(expected_state) {
            return Err(CalendarError::authorization(
                "callback state does not match the authorization request",
            ));
        }
        self.code
            .ok_or_else(|| CalendarError::authorization("callback carried no authorization code"))
    }
}

pub struct CallbackListener {
    listener: TcpListener,
}

impl CallbackListener {
    /// Bind the loopback port. Port 0 picks an ephemeral port.
    pub async fn bind(port: u16) -> CalendarResult<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .map_err(|e| CalendarError::Network {
                message: format!("failed to bind OAuth loopback listener on port {}: {}", port, e),
            })?;
        Ok(Self { listener })
    }

    pub fn port(&self) -> CalendarResult<u16> {
        Ok(self.listener.local_addr()?.port())
    }

    /// Wait for the redirect and return the authorization code.
    pub async fn wait_for_code(&self, expected_state: &str, timeout: Duration) -> CalendarResult<String> {
        tokio::time::timeout(timeout, self.accept_callback(expected_state))
            .await
            .map_err(|_| CalendarError::AuthorizationTimeout {
                timeout_seconds: timeout.as_secs(),
            })?
    }

    async fn accept_callback(&self, expected_state: &str) -> CalendarResult<String> {
        loop {
            let (mut stream, peer) = self.listener.accept().await?;
            debug!("OAuth callback connection from {}", peer);

            let target = match read_request_target(&mut stream).await {
                Ok(target) => target,
                Err(e) => {
                    warn!("Ignoring unreadable callback request: {}", e);
                    continue;
                }
            };

            let Some(query) = CallbackQuery::from_request_target(&target) else {
                respond(&mut stream, "404 Not Found", "").await;
                continue;
            };

            let outcome = query.into_code(expected_state);
            let page = if outcome.is_ok() { SUCCESS_PAGE } else { FAILURE_PAGE };
            respond(&mut stream, "200 OK", page).await;
            return outcome;
        }
    }
}

async fn read_request_target(stream: &mut TcpStream) -> CalendarResult<String> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    // Drain headers so the browser sees a clean response
    for _ in 0..MAX_HEADER_LINES {
        let mut header = String::new();
        let read = reader.read_line(&mut header).await?;
        if read == 0 || header == "\r\n" || header == "\n" {
            break;
        }
    }

    let mut parts = request_line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("GET"), Some(target)) => Ok(target.to_string()),
        _ => Err(CalendarError::Parsing {
            format: "HTTP request line".to_string(),
            message: request_line.trim().to_string(),
        }),
    }
}

async fn respond(stream: &mut TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    if let Err(e) = stream.write_all(response.as_bytes()).await {
        warn!("Failed to answer OAuth callback: {}", e);
    }
    let _ = stream.shutdown().await;
}
