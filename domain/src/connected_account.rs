use chrono::{DateTime, Utc};
use entity::connected_accounts::Model;
use platform_auth::{Platform, Tokens};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::Error;

/// A user's authenticated identity on one social platform.
#[derive(Debug, Clone)]
pub struct ConnectedAccount {
    pub id: String,
    pub platform: Platform,
    pub user_id: String,
    pub platform_user_id: String,
    pub platform_username: String,
    pub profile_image_url: Option<String>,
    pub tokens: Tokens,
    pub is_active: bool,
    pub connected_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Fields of an account that may change after it is connected.
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub tokens: Option<Tokens>,
    pub is_active: Option<bool>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl AccountUpdate {
    /// Replace the tokens and record the use in one write.
    pub fn replace_tokens(tokens: Tokens, used_at: DateTime<Utc>) -> Self {
        Self {
            tokens: Some(tokens),
            last_used_at: Some(used_at),
            ..Default::default()
        }
    }

    pub fn deactivate() -> Self {
        Self {
            is_active: Some(false),
            ..Default::default()
        }
    }

    pub fn apply_to(&self, account: &mut ConnectedAccount) {
        if let Some(tokens) = &self.tokens {
            account.tokens = tokens.clone();
        }
        if let Some(is_active) = self.is_active {
            account.is_active = is_active;
        }
        if let Some(last_used_at) = self.last_used_at {
            account.last_used_at = Some(last_used_at);
        }
    }
}

/// Token state safe to show a user; never carries token values.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TokenStatus {
    pub has_access_token: bool,
    pub has_refresh_token: bool,
    pub expires_at: DateTime<Utc>,
    pub is_expired: bool,
}

impl ConnectedAccount {
    /// Status as of `now`. Uses exact expiry, unlike the refresh path which
    /// applies the refresh buffer.
    pub fn token_status_at(&self, now: DateTime<Utc>) -> TokenStatus {
        TokenStatus {
            has_access_token: !self.tokens.access_token.expose_secret().is_empty(),
            has_refresh_token: self.tokens.has_refresh_token(),
            expires_at: self.tokens.expires_at,
            is_expired: self.tokens.has_lapsed(now),
        }
    }

    pub fn token_status(&self) -> TokenStatus {
        self.token_status_at(Utc::now())
    }

    /// Scopes the platform requests at consent time that this account was not granted.
    pub fn missing_scopes(&self) -> Vec<&'static str> {
        self.tokens.missing_scopes(self.platform.endpoints().scopes)
    }
}

impl TryFrom<Model> for ConnectedAccount {
    type Error = Error;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let platform: Platform = model.platform.parse()?;

        Ok(ConnectedAccount {
            id: model.id,
            platform,
            user_id: model.user_id,
            platform_user_id: model.platform_user_id,
            platform_username: model.platform_username,
            profile_image_url: model.profile_image_url,
            tokens: Tokens {
                access_token: SecretString::from(model.access_token),
                refresh_token: model.refresh_token.map(SecretString::from),
                expires_at: model.token_expires_at.with_timezone(&Utc),
                token_type: model.token_type,
                scope: model.scope,
            },
            is_active: model.is_active,
            connected_at: model.connected_at.with_timezone(&Utc),
            last_used_at: model.last_used_at.map(|at| at.with_timezone(&Utc)),
        })
    }
}

impl From<&ConnectedAccount> for Model {
    fn from(account: &ConnectedAccount) -> Self {
        Model {
            id: account.id.clone(),
            user_id: account.user_id.clone(),
            platform: account.platform.as_str().to_string(),
            platform_user_id: account.platform_user_id.clone(),
            platform_username: account.platform_username.clone(),
            profile_image_url: account.profile_image_url.clone(),
            access_token: account.tokens.access_token.expose_secret().clone(),
            refresh_token: account
                .tokens
                .refresh_token
                .as_ref()
                .map(|rt| rt.expose_secret().clone()),
            token_expires_at: account.tokens.expires_at.into(),
            token_type: account.tokens.token_type.clone(),
            scope: account.tokens.scope.clone(),
            is_active: account.is_active,
            connected_at: account.connected_at.into(),
            last_used_at: account.last_used_at.map(Into::into),
            updated_at: Utc::now().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::account;
    use chrono::{Duration, TimeZone};

    #[test]
    fn token_status_uses_exact_expiry() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut acct = account("acct-1", Platform::Twitter, now + Duration::minutes(2));
        acct.tokens.refresh_token = None;

        let status = acct.token_status_at(now);

        assert!(!status.is_expired);
        assert!(acct.tokens.is_expired_at(now, platform_auth::tokens::refresh_buffer()));
        assert!(status.has_access_token);
        assert!(!status.has_refresh_token);
    }

    #[test]
    fn update_applies_only_present_fields() {
        let now = Utc::now();
        let mut acct = account("acct-1", Platform::Youtube, now);
        let before = acct.tokens.access_token.expose_secret().clone();

        AccountUpdate::deactivate().apply_to(&mut acct);

        assert!(!acct.is_active);
        assert_eq!(acct.tokens.access_token.expose_secret(), &before);
        assert!(acct.last_used_at.is_none());
    }

    #[test]
    fn model_conversion_preserves_tokens_and_platform() {
        let acct = account("acct-1", Platform::Tiktok, Utc::now() + Duration::hours(1));

        let model = Model::from(&acct);
        assert_eq!(model.platform, "tiktok");

        let back = ConnectedAccount::try_from(model).unwrap();
        assert_eq!(back.platform, Platform::Tiktok);
        assert_eq!(
            back.tokens.expires_at.timestamp_millis(),
            acct.tokens.expires_at.timestamp_millis()
        );
        assert_eq!(
            back.tokens.refresh_token.map(|rt| rt.expose_secret().clone()),
            Some("r1".to_string())
        );
    }

    #[test]
    fn unknown_platform_in_row_is_an_error() {
        let mut model = Model::from(&account("acct-1", Platform::Twitter, Utc::now()));
        model.platform = "myspace".to_string();

        assert!(ConnectedAccount::try_from(model).is_err());
    }

    #[test]
    fn missing_scopes_checks_the_platform_consent_scopes() {
        let mut acct = account("acct-1", Platform::Twitter, Utc::now());
        acct.tokens.scope = Some("tweet.read users.read offline.access".to_string());

        assert_eq!(acct.missing_scopes(), vec!["tweet.write"]);
    }
}
