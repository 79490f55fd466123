//! Credential provider: authorization-code flow with a local token cache.
//!
//! The cache file format is internal. A valid cached token (or one that
//! can be refreshed with its refresh token) means repeated startups never
//! re-trigger the interactive flow.

use crate::error::AuthError;
use chrono::{DateTime, Duration, Utc};
use croonconf::SpotifyConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Scopes requested during interactive authorization.
const SCOPES: &str = "user-library-read playlist-read-private playlist-modify-public user-top-read";

/// Tokens are treated as expired this long before their actual expiry so
/// an in-flight request doesn't race the deadline.
const EXPIRY_MARGIN_SECS: i64 = 30;

/// What the token endpoint returns for both grant types.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
    #[serde(default)]
    scope: String,
}

/// On-disk token cache. Internal format; reloaded across restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedToken {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_at: DateTime<Utc>,
    #[serde(default)]
    scope: String,
}

impl CachedToken {
    fn from_response(response: TokenResponse, previous_refresh: Option<String>) -> Self {
        Self {
            access_token: response.access_token,
            // A refresh grant may omit the refresh token; keep the old one
            refresh_token: response.refresh_token.or(previous_refresh),
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
            scope: response.scope,
        }
    }

    fn expires_soon(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.expires_at
    }

    fn load(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable token cache");
                None
            }
        }
    }

    fn persist(&self, path: &Path) -> Result<(), AuthError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AuthError::Cache {
                action: "create directory for",
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        let contents = serde_json::to_string_pretty(self).expect("token cache serializes");
        std::fs::write(path, contents).map_err(|e| AuthError::Cache {
            action: "write",
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Obtains an authorized [`ClientHandle`] for the music provider.
pub struct Authenticator {
    config: SpotifyConfig,
    http: reqwest::Client,
}

impl Authenticator {
    pub fn new(config: SpotifyConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Acquire an authorized handle.
    ///
    /// Order of attempts: unexpired cached token, refresh grant with a
    /// cached refresh token, interactive authorization-code flow. The
    /// interactive flow prints the authorization URL and blocks until
    /// the user pastes the redirect URL back.
    pub async fn acquire(self) -> Result<ClientHandle, AuthError> {
        let missing = self.missing_credentials();
        if !missing.is_empty() {
            return Err(AuthError::MissingCredentials(missing.join(", ")));
        }

        let token = match CachedToken::load(&self.config.cache_path) {
            Some(cached) if !cached.expires_soon() => {
                debug!("using cached access token");
                cached
            }
            Some(cached) => match cached.refresh_token.clone() {
                Some(refresh) => {
                    info!("cached token expired, refreshing");
                    let response = token_request(
                        &self.http,
                        &self.config,
                        &[("grant_type", "refresh_token"), ("refresh_token", &refresh)],
                    )
                    .await?;
                    let token = CachedToken::from_response(response, Some(refresh));
                    token.persist(&self.config.cache_path)?;
                    token
                }
                None => self.interactive_flow().await?,
            },
            None => self.interactive_flow().await?,
        };

        Ok(ClientHandle {
            http: self.http,
            config: self.config,
            token: Mutex::new(token),
        })
    }

    fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.config.client_id.is_empty() {
            missing.push("client id");
        }
        if self.config.client_secret.is_empty() {
            missing.push("client secret");
        }
        if self.config.redirect_uri.is_empty() {
            missing.push("redirect uri");
        }
        missing
    }

    /// Run the authorization-code flow out-of-band: the user opens the
    /// printed URL, approves access, and pastes the redirect URL back.
    async fn interactive_flow(&self) -> Result<CachedToken, AuthError> {
        let authorize_url = format!(
            "{}/authorize?client_id={}&response_type=code&redirect_uri={}&scope={}",
            self.config.accounts_url,
            self.config.client_id,
            urlencode(&self.config.redirect_uri),
            urlencode(SCOPES),
        );

        println!("Open this URL in your browser and approve access:");
        println!("\n  {authorize_url}\n");

        let pasted: String = dialoguer::Input::new()
            .with_prompt("Paste the URL you were redirected to")
            .interact_text()?;

        let code = extract_code(pasted.trim())?;
        let response = token_request(
            &self.http,
            &self.config,
            &[
                ("grant_type", "authorization_code"),
                ("code", &code),
                ("redirect_uri", &self.config.redirect_uri),
            ],
        )
        .await?;

        let token = CachedToken::from_response(response, None);
        token.persist(&self.config.cache_path)?;
        info!("authorization complete, token cached");
        Ok(token)
    }
}

/// Authorized handle for the music provider. Opaque to callers; shared
/// read-only by the gateway. Mid-session refresh is internal.
#[derive(Debug)]
pub struct ClientHandle {
    http: reqwest::Client,
    config: SpotifyConfig,
    token: Mutex<CachedToken>,
}

impl ClientHandle {
    /// Current bearer token, refreshing it first if it is about to expire.
    pub(crate) async fn bearer(&self) -> Result<String, AuthError> {
        let mut token = self.token.lock().await;
        if token.expires_soon() {
            let refresh = token.refresh_token.clone().ok_or(AuthError::Expired)?;
            info!("access token expired mid-session, refreshing");
            let response = token_request(
                &self.http,
                &self.config,
                &[("grant_type", "refresh_token"), ("refresh_token", &refresh)],
            )
            .await?;
            *token = CachedToken::from_response(response, Some(refresh));
            if let Err(e) = token.persist(&self.config.cache_path) {
                warn!(error = %e, "could not persist refreshed token");
            }
        }
        Ok(token.access_token.clone())
    }
}

async fn token_request(
    http: &reqwest::Client,
    config: &SpotifyConfig,
    params: &[(&str, &str)],
) -> Result<TokenResponse, AuthError> {
    let response = http
        .post(format!("{}/api/token", config.accounts_url))
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(params)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::TokenExchange { status, body });
    }

    Ok(response.json().await?)
}

/// Pull the `code` query parameter out of a pasted redirect URL. A bare
/// code (no URL structure) is accepted as-is.
fn extract_code(pasted: &str) -> Result<String, AuthError> {
    if let Ok(url) = reqwest::Url::parse(pasted) {
        return url
            .query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| AuthError::BadRedirect(pasted.to_string()));
    }
    if !pasted.is_empty() && !pasted.contains(char::is_whitespace) {
        return Ok(pasted.to_string());
    }
    Err(AuthError::BadRedirect(pasted.to_string()))
}

/// Percent-encode the characters that matter for query values here.
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
