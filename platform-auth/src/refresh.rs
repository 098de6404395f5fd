//! Refresh engine: exchanges a refresh token at a platform's token endpoint.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{config_error, refresh_error, ConfigErrorKind, Error, RefreshErrorKind};
use crate::platform::Platform;
use crate::registry::PlatformRegistry;
use crate::tokens::{RefreshResult, Tokens};

/// Something that can mint new tokens from a refresh token.
///
/// Implementations make exactly one attempt per call. Any `Err` means "refresh
/// failed"; callers decide what happens next.
#[async_trait]
pub trait Refresher: Send + Sync {
    async fn refresh(&self, platform: Platform, refresh_token: &str)
        -> Result<RefreshResult, Error>;
}

/// Successful token endpoint response body.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Convert into tokens received at `received_at`.
    ///
    /// Platforms that only issue a refresh token on the first grant omit it here,
    /// in which case `previous_refresh_token` is carried over. An `expires_in`
    /// that cannot be turned into an instant is an invalid response.
    pub fn into_refresh_result(
        self,
        previous_refresh_token: &str,
        received_at: DateTime<Utc>,
    ) -> Result<RefreshResult, Error> {
        let expires_in = self.expires_in;
        let issued = self.refresh_token.filter(|rt| !rt.is_empty());
        let rotated = issued
            .as_deref()
            .is_some_and(|rt| rt != previous_refresh_token);

        let mut tokens = Tokens::from_lifetime(
            self.access_token,
            Some(issued.unwrap_or_else(|| previous_refresh_token.to_string())),
            expires_in,
            received_at,
        )
        .ok_or_else(|| {
            refresh_error(
                RefreshErrorKind::InvalidResponse,
                &format!("expires_in of {expires_in} seconds is out of range"),
            )
        })?;
        if let Some(token_type) = self.token_type.filter(|t| !t.is_empty()) {
            tokens.token_type = token_type;
        }
        tokens.scope = self.scope;

        Ok(if rotated {
            RefreshResult::with_rotation(tokens)
        } else {
            RefreshResult::no_rotation(tokens)
        })
    }
}

/// Form body of the OAuth2 refresh grant.
#[derive(Serialize)]
struct RefreshRequest<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// Default per-request timeout for token endpoint calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Refresher`] that talks to the real platform token endpoints.
pub struct TokenEndpointClient {
    http_client: reqwest::Client,
    platforms: PlatformRegistry,
}

impl TokenEndpointClient {
    /// Create a client with the given per-request timeout.
    pub fn new(platforms: PlatformRegistry, timeout: Duration) -> Result<Self, Error> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("platform-auth/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            platforms,
        })
    }
}

#[async_trait]
impl Refresher for TokenEndpointClient {
    async fn refresh(
        &self,
        platform: Platform,
        refresh_token: &str,
    ) -> Result<RefreshResult, Error> {
        let settings = self.platforms.get(platform);

        let token_url = settings
            .and_then(|s| s.token_url.as_deref())
            .ok_or_else(|| {
                warn!("No token URL configured for platform: {}", platform);
                config_error(ConfigErrorKind::MissingTokenUrl, platform.as_str())
            })?;

        let credentials = settings
            .and_then(|s| s.credentials.as_ref())
            .ok_or_else(|| {
                warn!("Missing OAuth credentials for {}", platform);
                config_error(ConfigErrorKind::MissingCredentials, platform.as_str())
            })?;

        let request = RefreshRequest {
            grant_type: "refresh_token",
            refresh_token,
            client_id: &credentials.client_id,
            client_secret: credentials.client_secret.expose_secret(),
        };

        debug!("Refreshing {} access token", platform);

        let response = self
            .http_client
            .post(token_url)
            .form(&request)
            .send()
            .await
            .inspect_err(|e| warn!("Failed to reach {} token endpoint: {:?}", platform, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Token refresh failed for {} ({}): {}", platform, status, error_text);
            return Err(refresh_error(
                RefreshErrorKind::Rejected,
                &format!("{} returned {}: {}", platform, status, error_text),
            ));
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse {} token refresh response: {:?}", platform, e);
            Error {
                source: Some(Box::new(e)),
                error_kind: crate::ErrorKind::Refresh(RefreshErrorKind::InvalidResponse),
            }
        })?;

        let result = body
            .into_refresh_result(refresh_token, Utc::now())
            .inspect_err(|e| warn!("Rejecting {} token refresh response: {}", platform, e))?;
        if result.refresh_token_rotated {
            debug!("{} rotated the refresh token", platform);
        }
        info!("Successfully refreshed {} access token", platform);

        Ok(result)
    }
}

/// Convenience for callers that hold the refresh token as a secret.
pub async fn refresh_with<R: Refresher + ?Sized>(
    refresher: &R,
    platform: Platform,
    refresh_token: &SecretString,
) -> Result<RefreshResult, Error> {
    refresher
        .refresh(platform, refresh_token.expose_secret())
        .await
}
