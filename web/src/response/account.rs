use chrono::{DateTime, Utc};
use domain::connected_account::{ConnectedAccount, TokenStatus};
use serde::Serialize;
use utoipa::ToSchema;

/// A connected account as shown to its owner. Token values are never included.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: String,
    pub platform: String,
    pub platform_user_id: String,
    pub platform_username: String,
    pub profile_image_url: Option<String>,
    pub is_active: bool,
    pub connected_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub token_status: TokenStatus,
    /// Consent scopes the platform did not grant.
    pub missing_scopes: Vec<String>,
}

impl From<&ConnectedAccount> for AccountResponse {
    fn from(account: &ConnectedAccount) -> Self {
        Self {
            id: account.id.clone(),
            platform: account.platform.to_string(),
            platform_user_id: account.platform_user_id.clone(),
            platform_username: account.platform_username.clone(),
            profile_image_url: account.profile_image_url.clone(),
            is_active: account.is_active,
            connected_at: account.connected_at,
            last_used_at: account.last_used_at,
            token_status: account.token_status(),
            missing_scopes: account
                .missing_scopes()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    pub account_id: String,
    pub is_active: bool,
    pub token_available: bool,
}
