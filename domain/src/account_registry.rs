//! CRUD over connected accounts, scoped by user and by (user, platform).

use std::sync::Arc;

use chrono::Utc;
use log::debug;

use crate::account_store::AccountStore;
use crate::connected_account::{AccountUpdate, ConnectedAccount};
use crate::error::Error;
use crate::{Platform, Tokens};

#[derive(Clone)]
pub struct AccountRegistry {
    store: Arc<dyn AccountStore>,
}

impl AccountRegistry {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    pub async fn store(&self, account: &ConnectedAccount) -> Result<(), Error> {
        debug!(
            "Storing {} account {} for user {}",
            account.platform, account.id, account.user_id
        );
        self.store.put(account).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<ConnectedAccount>, Error> {
        self.store.get(id).await
    }

    pub async fn get_all_for_user(&self, user_id: &str) -> Result<Vec<ConnectedAccount>, Error> {
        self.store.get_all_for_user(user_id).await
    }

    pub async fn get_by_platform(
        &self,
        user_id: &str,
        platform: Platform,
    ) -> Result<Option<ConnectedAccount>, Error> {
        self.store.get_by_user_and_platform(user_id, platform).await
    }

    pub async fn remove(&self, id: &str) -> Result<bool, Error> {
        self.store.delete(id).await
    }

    /// Replace the account's tokens, stamping `last_used_at` in the same write.
    /// Returns `false` if the account does not exist.
    pub async fn update_tokens(&self, id: &str, tokens: Tokens) -> Result<bool, Error> {
        let updated = self
            .store
            .update(id, &AccountUpdate::replace_tokens(tokens, Utc::now()))
            .await?;
        Ok(updated.is_some())
    }

    /// Flag the account as needing reconnection. Tokens are left as they are.
    pub async fn deactivate(&self, id: &str) -> Result<bool, Error> {
        let updated = self.store.update(id, &AccountUpdate::deactivate()).await?;
        Ok(updated.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account_store::MemoryAccountStore;
    use crate::test_support::{account, CountingStore, FailingStore};
    use chrono::Duration;
    use secrecy::ExposeSecret;

    fn registry_over(memory: &MemoryAccountStore) -> AccountRegistry {
        AccountRegistry::new(Arc::new(memory.clone()))
    }

    #[tokio::test]
    async fn update_tokens_stamps_last_used_in_a_single_update() {
        let counting = CountingStore::new();
        let registry = AccountRegistry::new(Arc::new(counting.clone()));
        registry
            .store(&account("acct-1", Platform::Twitter, Utc::now()))
            .await
            .unwrap();

        let mut tokens = account("x", Platform::Twitter, Utc::now() + Duration::hours(2)).tokens;
        tokens.access_token = "fresh".to_string().into();
        assert!(registry.update_tokens("acct-1", tokens).await.unwrap());

        assert_eq!(counting.update_calls(), 1);
        let stored = registry.get("acct-1").await.unwrap().unwrap();
        assert_eq!(stored.tokens.access_token.expose_secret(), "fresh");
        assert!(stored.last_used_at.is_some());
    }

    #[tokio::test]
    async fn not_found_is_false_not_an_error() {
        let registry = registry_over(&MemoryAccountStore::new());
        let tokens = account("x", Platform::Twitter, Utc::now()).tokens;

        assert!(!registry.update_tokens("missing", tokens).await.unwrap());
        assert!(!registry.deactivate("missing").await.unwrap());
        assert!(!registry.remove("missing").await.unwrap());
        assert!(registry.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deactivate_keeps_tokens() {
        let memory = MemoryAccountStore::new();
        let registry = registry_over(&memory);
        registry
            .store(&account("acct-1", Platform::Linkedin, Utc::now()))
            .await
            .unwrap();

        assert!(registry.deactivate("acct-1").await.unwrap());

        let stored = memory.get("acct-1").await.unwrap().unwrap();
        assert!(!stored.is_active);
        assert_eq!(stored.tokens.access_token.expose_secret(), "old");
    }

    #[tokio::test]
    async fn get_by_platform_is_scoped_to_the_user() {
        let registry = registry_over(&MemoryAccountStore::new());
        registry
            .store(&account("acct-1", Platform::Tiktok, Utc::now()))
            .await
            .unwrap();

        assert!(registry
            .get_by_platform("user-1", Platform::Tiktok)
            .await
            .unwrap()
            .is_some());
        assert!(registry
            .get_by_platform("user-2", Platform::Tiktok)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn backend_failures_are_errors() {
        let registry = AccountRegistry::new(Arc::new(FailingStore));
        assert!(registry.get("acct-1").await.is_err());
        assert!(registry.deactivate("acct-1").await.is_err());
    }
}
