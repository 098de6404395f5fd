//! Valid-token orchestrator with per-account refresh locking.

use std::sync::Arc;

use dashmap::DashMap;
use log::{debug, error, info, warn};
use platform_auth::refresh::refresh_with;
use secrecy::SecretString;
use tokio::sync::Mutex;

use crate::account_registry::AccountRegistry;
use crate::connected_account::ConnectedAccount;
use crate::error::Error;
use crate::{Platform, Refresher, Tokens};

/// Hands out access tokens that are safe to use right now.
///
/// Concurrent callers asking for the same expired account are serialized on a
/// per-account lock; the second caller re-reads the account after the first
/// finishes and reuses its refreshed token instead of spending the refresh
/// token again.
pub struct TokenService {
    registry: AccountRegistry,
    refresher: Arc<dyn Refresher>,
    refresh_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl TokenService {
    pub fn new(registry: AccountRegistry, refresher: Arc<dyn Refresher>) -> Self {
        Self {
            registry,
            refresher,
            refresh_locks: DashMap::new(),
        }
    }

    /// Get a bearer token for `account_id`, refreshing it first if it is within
    /// the refresh buffer of expiring.
    ///
    /// Returns `Ok(None)` when no usable token can be produced: the account does
    /// not exist, is already flagged for reconnection, has no refresh token, or
    /// the platform refused the refresh. The last two flag the account inactive.
    /// `Err` only when the account store itself is unavailable.
    pub async fn get_valid_access_token(
        &self,
        account_id: &str,
    ) -> Result<Option<SecretString>, Error> {
        let Some(account) = self.registry.get(account_id).await? else {
            error!("Connected account not found: {account_id}");
            return Ok(None);
        };

        if !account.tokens.is_expired() {
            return Ok(Some(account.tokens.access_token));
        }

        debug!(
            "{} token expired for account {}, refreshing",
            account.platform, account_id
        );

        let lock = self
            .refresh_locks
            .entry(account_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let result = {
            let _guard = lock.lock().await;
            self.refresh_locked(account_id).await
        };

        // The map and `lock` are the only holders when nobody else is queued.
        self.refresh_locks
            .remove_if(account_id, |_, entry| Arc::strong_count(entry) == 2);

        result
    }

    /// Runs with the account's refresh lock held.
    async fn refresh_locked(&self, account_id: &str) -> Result<Option<SecretString>, Error> {
        // Another caller may have refreshed while we waited.
        let Some(account) = self.registry.get(account_id).await? else {
            error!("Connected account {account_id} was removed during refresh");
            return Ok(None);
        };

        if !account.tokens.is_expired() {
            debug!("Token for account {account_id} was refreshed by another request");
            return Ok(Some(account.tokens.access_token));
        }

        self.refresh_expired(account).await
    }

    async fn refresh_expired(
        &self,
        account: ConnectedAccount,
    ) -> Result<Option<SecretString>, Error> {
        if !account.is_active {
            warn!(
                "{} account {} needs reconnection; not attempting refresh",
                account.platform, account.id
            );
            return Ok(None);
        }

        let Some(refresh_token) = account
            .tokens
            .refresh_token
            .as_ref()
            .filter(|_| account.tokens.has_refresh_token())
        else {
            error!(
                "{} token expired for account {} and no refresh token is available",
                account.platform, account.id
            );
            self.registry.deactivate(&account.id).await?;
            return Ok(None);
        };

        match refresh_with(self.refresher.as_ref(), account.platform, refresh_token).await {
            Ok(result) => {
                if result.refresh_token_rotated {
                    info!("{} rotated the refresh token for account {}", account.platform, account.id);
                }
                let access_token = result.tokens.access_token.clone();
                if !self.registry.update_tokens(&account.id, result.tokens).await? {
                    warn!(
                        "Account {} was removed before its refreshed tokens could be saved",
                        account.id
                    );
                }
                Ok(Some(access_token))
            }
            Err(err) => {
                error!(
                    "Failed to refresh {} token for account {}: {}",
                    account.platform, account.id, err
                );
                self.registry.deactivate(&account.id).await?;
                Ok(None)
            }
        }
    }

    pub async fn get_connected_accounts(
        &self,
        user_id: &str,
    ) -> Result<Vec<ConnectedAccount>, Error> {
        self.registry.get_all_for_user(user_id).await
    }

    pub async fn get_connected_account(
        &self,
        account_id: &str,
    ) -> Result<Option<ConnectedAccount>, Error> {
        self.registry.get(account_id).await
    }

    pub async fn get_connected_account_by_platform(
        &self,
        user_id: &str,
        platform: Platform,
    ) -> Result<Option<ConnectedAccount>, Error> {
        self.registry.get_by_platform(user_id, platform).await
    }

    /// Entry point for the OAuth callback flow once it holds a finished account.
    pub async fn store_connected_account(&self, account: &ConnectedAccount) -> Result<(), Error> {
        self.registry.store(account).await
    }

    pub async fn remove_connected_account(&self, account_id: &str) -> Result<bool, Error> {
        let removed = self.registry.remove(account_id).await?;
        self.refresh_locks.remove(account_id);
        Ok(removed)
    }

    pub async fn update_account_tokens(
        &self,
        account_id: &str,
        tokens: Tokens,
    ) -> Result<bool, Error> {
        self.registry.update_tokens(account_id, tokens).await
    }
}
