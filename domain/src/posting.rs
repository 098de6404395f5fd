//! Credentials for publishing to a platform on a user's behalf.

use log::warn;
use secrecy::SecretString;

use crate::error::{AccountErrorKind, Error};
use crate::token_service::TokenService;
use crate::Platform;

/// Bearer token for posting to `platform` as `user_id`.
///
/// Fails with an account error whose message can be shown to the user as is
/// when nothing is connected or the connection must be renewed.
pub async fn access_token_for(
    tokens: &TokenService,
    user_id: &str,
    platform: Platform,
) -> Result<SecretString, Error> {
    let Some(account) = tokens
        .get_connected_account_by_platform(user_id, platform)
        .await?
    else {
        return Err(Error::account(AccountErrorKind::NotConnected(platform)));
    };

    match tokens.get_valid_access_token(&account.id).await? {
        Some(access_token) => Ok(access_token),
        None => {
            warn!("No usable {platform} token for user {user_id}; reconnection required");
            Err(Error::account(AccountErrorKind::ReconnectRequired(platform)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account_registry::AccountRegistry;
    use crate::account_store::MemoryAccountStore;
    use crate::error::DomainErrorKind;
    use crate::test_support::{account, StubRefresher};
    use chrono::{Duration, Utc};
    use secrecy::ExposeSecret;
    use std::sync::Arc;

    fn service(refresher: Arc<StubRefresher>) -> TokenService {
        TokenService::new(
            AccountRegistry::new(Arc::new(MemoryAccountStore::new())),
            refresher,
        )
    }

    #[tokio::test]
    async fn missing_account_reports_not_connected() {
        let svc = service(StubRefresher::succeeding("new"));

        let err = access_token_for(&svc, "user-1", Platform::Youtube)
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Account(AccountErrorKind::NotConnected(Platform::Youtube))
        );
        assert_eq!(err.to_string(), "No YouTube account connected");
    }

    #[tokio::test]
    async fn failed_refresh_asks_the_user_to_reconnect() {
        let svc = service(StubRefresher::failing());
        svc.store_connected_account(&account(
            "acct-1",
            Platform::Tiktok,
            Utc::now() - Duration::hours(1),
        ))
        .await
        .unwrap();

        let err = access_token_for(&svc, "user-1", Platform::Tiktok)
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to get valid access token. Please reconnect your TikTok account."
        );
    }

    #[tokio::test]
    async fn valid_account_yields_its_token() {
        let svc = service(StubRefresher::failing());
        svc.store_connected_account(&account(
            "acct-1",
            Platform::Facebook,
            Utc::now() + Duration::hours(1),
        ))
        .await
        .unwrap();

        let token = access_token_for(&svc, "user-1", Platform::Facebook)
            .await
            .unwrap();
        assert_eq!(token.expose_secret(), "old");
    }
}
