//! OAuth token types and the expiry policy.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};

/// Lead time before real expiry at which a token is already treated as expired.
pub const REFRESH_BUFFER_MINUTES: i64 = 5;

/// The refresh buffer as a duration.
pub fn refresh_buffer() -> Duration {
    Duration::minutes(REFRESH_BUFFER_MINUTES)
}

/// OAuth tokens with metadata.
#[derive(Debug, Clone)]
pub struct Tokens {
    /// Access token for API requests.
    pub access_token: SecretString,
    /// Refresh token for obtaining new access tokens.
    pub refresh_token: Option<SecretString>,
    /// Absolute instant the access token expires.
    pub expires_at: DateTime<Utc>,
    /// Token type (usually "Bearer").
    pub token_type: String,
    /// Space delimited granted scopes.
    pub scope: Option<String>,
}

impl Tokens {
    /// Build tokens from a relative lifetime as returned by token endpoints.
    /// `expires_in_secs` is converted to an absolute instant against `received_at`.
    ///
    /// Returns `None` when the resulting instant is out of range.
    pub fn from_lifetime(
        access_token: String,
        refresh_token: Option<String>,
        expires_in_secs: i64,
        received_at: DateTime<Utc>,
    ) -> Option<Self> {
        let lifetime = expires_in_secs
            .checked_mul(1000)
            .and_then(Duration::try_milliseconds)?;

        Some(Self {
            access_token: SecretString::from(access_token),
            refresh_token: refresh_token.map(SecretString::from),
            expires_at: received_at.checked_add_signed(lifetime)?,
            token_type: "Bearer".to_string(),
            scope: None,
        })
    }

    /// True when `now` is at or past `expires_at - buffer`.
    pub fn is_expired_at(&self, now: DateTime<Utc>, buffer: Duration) -> bool {
        now >= self.expires_at - buffer
    }

    /// Check if the access token is expired or about to expire soon.
    ///
    /// Returns true if token is expired or will expire within the refresh buffer.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now(), refresh_buffer())
    }

    /// Exact expiry check with no buffer, for informational display.
    pub fn has_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.is_expired_at(now, Duration::zero())
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token
            .as_ref()
            .is_some_and(|token| !token.expose_secret().is_empty())
    }

    /// Scopes from `required` that the platform did not grant.
    ///
    /// Tokens without scope information are assumed to carry everything requested.
    pub fn missing_scopes<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        let Some(scope) = self.scope.as_deref() else {
            return Vec::new();
        };
        // Some platforms delimit with commas instead of spaces.
        let granted: Vec<&str> = scope
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .collect();
        required
            .iter()
            .copied()
            .filter(|needed| !granted.contains(needed))
            .collect()
    }
}

/// Result of a token refresh operation.
#[derive(Debug, Clone)]
pub struct RefreshResult {
    /// The new tokens.
    pub tokens: Tokens,
    /// True if the platform issued a different refresh token.
    pub refresh_token_rotated: bool,
}

impl RefreshResult {
    /// Create a refresh result with no rotation.
    pub fn no_rotation(tokens: Tokens) -> Self {
        Self {
            tokens,
            refresh_token_rotated: false,
        }
    }

    /// Create a refresh result with rotation.
    pub fn with_rotation(tokens: Tokens) -> Self {
        Self {
            tokens,
            refresh_token_rotated: true,
        }
    }
}
