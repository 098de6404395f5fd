use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::AccountStore;
use crate::connected_account::{AccountUpdate, ConnectedAccount};
use crate::error::Error;
use crate::Platform;

/// Process-local account store. Contents are lost on restart.
///
/// Clones share the same map, so one instance can be handed to the fallback
/// decorator and still be inspected elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountStore {
    accounts: Arc<RwLock<HashMap<String, ConnectedAccount>>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn get(&self, id: &str) -> Result<Option<ConnectedAccount>, Error> {
        Ok(self.accounts.read().await.get(id).cloned())
    }

    async fn get_all_for_user(&self, user_id: &str) -> Result<Vec<ConnectedAccount>, Error> {
        let mut accounts: Vec<ConnectedAccount> = self
            .accounts
            .read()
            .await
            .values()
            .filter(|account| account.user_id == user_id)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(accounts)
    }

    async fn get_by_user_and_platform(
        &self,
        user_id: &str,
        platform: Platform,
    ) -> Result<Option<ConnectedAccount>, Error> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .filter(|account| account.user_id == user_id && account.platform == platform)
            .min_by(|a, b| {
                a.connected_at
                    .cmp(&b.connected_at)
                    .then_with(|| a.id.cmp(&b.id))
            })
            .cloned())
    }

    async fn put(&self, account: &ConnectedAccount) -> Result<(), Error> {
        self.accounts
            .write()
            .await
            .insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: &str,
        update: &AccountUpdate,
    ) -> Result<Option<ConnectedAccount>, Error> {
        let mut accounts = self.accounts.write().await;
        Ok(accounts.get_mut(id).map(|account| {
            update.apply_to(account);
            account.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool, Error> {
        Ok(self.accounts.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{account, account_for};
    use chrono::{Duration, Utc};
    use secrecy::ExposeSecret;

    #[tokio::test]
    async fn put_then_get_returns_the_account() {
        let store = MemoryAccountStore::new();
        store
            .put(&account("acct-1", Platform::Youtube, Utc::now()))
            .await
            .unwrap();

        let found = store.get("acct-1").await.unwrap().unwrap();
        assert_eq!(found.platform, Platform::Youtube);
        assert!(store.get("acct-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fresh_instances_do_not_share_state() {
        let first = MemoryAccountStore::new();
        first
            .put(&account("acct-1", Platform::Youtube, Utc::now()))
            .await
            .unwrap();

        assert!(MemoryAccountStore::new().is_empty().await);
        assert_eq!(first.clone().len().await, 1);
    }

    #[tokio::test]
    async fn get_by_user_and_platform_returns_earliest_connection() {
        let store = MemoryAccountStore::new();
        let now = Utc::now();

        let mut newer = account_for("newer", "user-1", Platform::Twitter, now);
        newer.connected_at = now;
        let mut older = account_for("older", "user-1", Platform::Twitter, now);
        older.connected_at = now - Duration::days(3);
        let other_user = account_for("other", "user-2", Platform::Twitter, now);

        for acct in [&newer, &older, &other_user] {
            store.put(acct).await.unwrap();
        }

        let found = store
            .get_by_user_and_platform("user-1", Platform::Twitter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, "older");
        assert!(store
            .get_by_user_and_platform("user-1", Platform::Youtube)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn get_all_for_user_is_scoped_to_the_user() {
        let store = MemoryAccountStore::new();
        let now = Utc::now();
        store
            .put(&account_for("a", "user-1", Platform::Twitter, now))
            .await
            .unwrap();
        store
            .put(&account_for("b", "user-1", Platform::Youtube, now))
            .await
            .unwrap();
        store
            .put(&account_for("c", "user-2", Platform::Youtube, now))
            .await
            .unwrap();

        let ids: Vec<String> = store
            .get_all_for_user("user-1")
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn update_of_unknown_id_returns_none() {
        let store = MemoryAccountStore::new();
        let result = store
            .update("missing", &AccountUpdate::deactivate())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn update_replaces_tokens_in_place() {
        let store = MemoryAccountStore::new();
        let now = Utc::now();
        store
            .put(&account("acct-1", Platform::Twitter, now))
            .await
            .unwrap();

        let mut tokens = account("x", Platform::Twitter, now + Duration::hours(1)).tokens;
        tokens.access_token = "new".to_string().into();
        let updated = store
            .update("acct-1", &AccountUpdate::replace_tokens(tokens, now))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.tokens.access_token.expose_secret(), "new");
        assert_eq!(updated.last_used_at, Some(now));
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let store = MemoryAccountStore::new();
        store
            .put(&account("acct-1", Platform::Twitter, Utc::now()))
            .await
            .unwrap();

        assert!(store.delete("acct-1").await.unwrap());
        assert!(!store.delete("acct-1").await.unwrap());
    }
}
