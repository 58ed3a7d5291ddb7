//! Authorization flow boundary: turns cached or freshly granted consent into a bearer credential.
//!
//! The OAuth2 protocol work (PKCE, code exchange, refresh) is delegated to the `oauth2` crate.

use chrono::{Duration, Utc};
use oauth2::{
    basic::{BasicClient, BasicTokenResponse},
    reqwest::async_http_client,
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge, RedirectUrl,
    RefreshToken, Scope, TokenResponse, TokenUrl,
};
use std::fmt;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::errors::{CalendarError, CalendarResult};

pub mod callback;
pub mod client_secret;
pub mod token_store;

use callback::CallbackListener;
use client_secret::InstalledAppSecret;
use token_store::{StoredToken, TokenStore};

/// Opaque bearer token. Only the live transport reads it.
#[derive(Clone)]
pub struct Credential {
    access_token: String,
}

impl Credential {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub(crate) fn secret(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([redacted])")
    }
}

/// Produce a credential for `scope`, reusing the token cache when possible.
///
/// On a cache miss this blocks on browser consent for at most `config.auth_timeout()`.
pub async fn authorize(config: &AppConfig, scope: &str) -> CalendarResult<Credential> {
    let secret = InstalledAppSecret::load(&config.client_secret_path).await?;
    let client = oauth_client(&secret, config.redirect_uri())?;
    let store = TokenStore::new(&config.token_cache_dir, &config.user);

    if let Some(token) = store.load().await? {
        if !token.covers_scope(scope) {
            info!("Cached token lacks scope {}, requesting consent again", scope);
        } else if !token.needs_refresh(Utc::now()) {
            debug!("Using cached token from {:?}", store.path());
            return Ok(Credential::new(token.access_token));
        } else if let Some(refresh_token) = token.refresh_token.clone() {
            debug!("Access token expired, refreshing...");
            let refreshed = refresh(&client, &token, refresh_token).await?;
            store.store(&refreshed).await?;
            info!("Access token refreshed");
            return Ok(Credential::new(refreshed.access_token));
        } else {
            info!("Cached token expired and has no refresh token, requesting consent again");
        }
    }

    let token = run_consent_flow(&client, config, scope).await?;
    store.store(&token).await?;
    info!("Authorization successful, token cached at {:?}", store.path());
    Ok(Credential::new(token.access_token))
}

fn oauth_client(secret: &InstalledAppSecret, redirect_uri: String) -> CalendarResult<BasicClient> {
    let client = BasicClient::new(
        ClientId::new(secret.client_id.clone()),
        Some(ClientSecret::new(secret.client_secret.clone())),
        AuthUrl::new(secret.auth_uri.clone()).map_err(url_error)?,
        Some(TokenUrl::new(secret.token_uri.clone()).map_err(url_error)?),
    )
    .set_redirect_uri(RedirectUrl::new(redirect_uri).map_err(url_error)?);

    Ok(client)
}

fn url_error(error: oauth2::url::ParseError) -> CalendarError {
    CalendarError::Parsing {
        format: "URL".to_string(),
        message: error.to_string(),
    }
}

async fn run_consent_flow(
    client: &BasicClient,
    config: &AppConfig,
    scope: &str,
) -> CalendarResult<StoredToken> {
    let listener = CallbackListener::bind(config.callback_port).await?;
    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

    let (auth_url, csrf_token) = client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::new(scope.to_string()))
        .add_extra_param("access_type", "offline")
        .set_pkce_challenge(pkce_challenge)
        .url();

    eprintln!("Please open the following address in your browser:");
    eprintln!("  {}", auth_url);
    eprintln!(
        "Waiting up to {}s for the redirect to {}",
        config.auth_timeout_secs,
        config.redirect_uri()
    );

    let code = listener
        .wait_for_code(csrf_token.secret(), config.auth_timeout())
        .await?;

    debug!("Exchanging authorization code for access token");
    let response = client
        .exchange_code(AuthorizationCode::new(code))
        .set_pkce_verifier(pkce_verifier)
        .request_async(async_http_client)
        .await
        .map_err(|e| CalendarError::authorization(format!("token exchange failed: {}", e)))?;

    Ok(stored_token_from(&response, vec![scope.to_string()], None))
}

async fn refresh(
    client: &BasicClient,
    current: &StoredToken,
    refresh_token: String,
) -> CalendarResult<StoredToken> {
    let response = client
        .exchange_refresh_token(&RefreshToken::new(refresh_token.clone()))
        .request_async(async_http_client)
        .await
        .map_err(|e| CalendarError::authorization(format!("failed to refresh token: {}", e)))?;

    // Google omits the refresh token on refresh; keep the existing one
    Ok(stored_token_from(
        &response,
        current.scopes.clone(),
        Some(refresh_token),
    ))
}

fn stored_token_from(
    response: &BasicTokenResponse,
    scopes: Vec<String>,
    previous_refresh_token: Option<String>,
) -> StoredToken {
    StoredToken {
        access_token: response.access_token().secret().clone(),
        refresh_token: response
            .refresh_token()
            .map(|t| t.secret().clone())
            .or(previous_refresh_token),
        expires_at: response
            .expires_in()
            .map(|d| Utc::now() + Duration::seconds(d.as_secs() as i64)),
        scopes,
    }
}
