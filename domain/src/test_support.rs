//! Fixtures shared by the domain unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use platform_auth::error::{refresh_error, RefreshErrorKind};
use secrecy::SecretString;

use crate::account_store::{AccountStore, MemoryAccountStore};
use crate::connected_account::{AccountUpdate, ConnectedAccount};
use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use crate::{Platform, RefreshResult, Refresher, Tokens};

/// An active account owned by `user-1` holding access token `old` and refresh token `r1`.
pub fn account(id: &str, platform: Platform, expires_at: DateTime<Utc>) -> ConnectedAccount {
    account_for(id, "user-1", platform, expires_at)
}

pub fn account_for(
    id: &str,
    user_id: &str,
    platform: Platform,
    expires_at: DateTime<Utc>,
) -> ConnectedAccount {
    ConnectedAccount {
        id: id.to_string(),
        platform,
        user_id: user_id.to_string(),
        platform_user_id: format!("{platform}-{id}"),
        platform_username: "creator".to_string(),
        profile_image_url: None,
        tokens: Tokens {
            access_token: SecretString::from("old".to_string()),
            refresh_token: Some(SecretString::from("r1".to_string())),
            expires_at,
            token_type: "Bearer".to_string(),
            scope: None,
        },
        is_active: true,
        connected_at: Utc::now(),
        last_used_at: None,
    }
}

/// A store whose backend is always down.
pub struct FailingStore;

fn unavailable() -> Error {
    Error {
        source: Some("connection refused".into()),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
            "store unavailable".to_string(),
        )),
    }
}

#[async_trait]
impl AccountStore for FailingStore {
    async fn get(&self, _id: &str) -> Result<Option<ConnectedAccount>, Error> {
        Err(unavailable())
    }

    async fn get_all_for_user(&self, _user_id: &str) -> Result<Vec<ConnectedAccount>, Error> {
        Err(unavailable())
    }

    async fn get_by_user_and_platform(
        &self,
        _user_id: &str,
        _platform: Platform,
    ) -> Result<Option<ConnectedAccount>, Error> {
        Err(unavailable())
    }

    async fn put(&self, _account: &ConnectedAccount) -> Result<(), Error> {
        Err(unavailable())
    }

    async fn update(
        &self,
        _id: &str,
        _update: &AccountUpdate,
    ) -> Result<Option<ConnectedAccount>, Error> {
        Err(unavailable())
    }

    async fn delete(&self, _id: &str) -> Result<bool, Error> {
        Err(unavailable())
    }
}

/// Memory store that counts `update` calls.
#[derive(Clone, Default)]
pub struct CountingStore {
    inner: MemoryAccountStore,
    updates: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, account: ConnectedAccount) {
        self.inner.put(&account).await.unwrap();
    }

    pub async fn get_now(&self, id: &str) -> Option<ConnectedAccount> {
        self.inner.get(id).await.unwrap()
    }

    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountStore for CountingStore {
    async fn get(&self, id: &str) -> Result<Option<ConnectedAccount>, Error> {
        self.inner.get(id).await
    }

    async fn get_all_for_user(&self, user_id: &str) -> Result<Vec<ConnectedAccount>, Error> {
        self.inner.get_all_for_user(user_id).await
    }

    async fn get_by_user_and_platform(
        &self,
        user_id: &str,
        platform: Platform,
    ) -> Result<Option<ConnectedAccount>, Error> {
        self.inner.get_by_user_and_platform(user_id, platform).await
    }

    async fn put(&self, account: &ConnectedAccount) -> Result<(), Error> {
        self.inner.put(account).await
    }

    async fn update(
        &self,
        id: &str,
        update: &AccountUpdate,
    ) -> Result<Option<ConnectedAccount>, Error> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(id, update).await
    }

    async fn delete(&self, id: &str) -> Result<bool, Error> {
        self.inner.delete(id).await
    }
}

/// Refresher that either mints `access_token` valid for an hour or always fails.
pub struct StubRefresher {
    access_token: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl StubRefresher {
    fn build(access_token: Option<&str>, delay: Option<Duration>) -> Arc<Self> {
        Arc::new(Self {
            access_token: access_token.map(str::to_string),
            delay,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn succeeding(access_token: &str) -> Arc<Self> {
        Self::build(Some(access_token), None)
    }

    pub fn succeeding_after(access_token: &str, delay: Duration) -> Arc<Self> {
        Self::build(Some(access_token), Some(delay))
    }

    pub fn failing() -> Arc<Self> {
        Self::build(None, None)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn refresh_tokens_seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Refresher for StubRefresher {
    async fn refresh(
        &self,
        _platform: Platform,
        refresh_token: &str,
    ) -> Result<RefreshResult, platform_auth::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(refresh_token.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.access_token {
            Some(access_token) => Ok(RefreshResult::no_rotation(Tokens::from_lifetime(
                access_token.clone(),
                Some(refresh_token.to_string()),
                3600,
                Utc::now(),
            )
            .unwrap())),
            None => Err(refresh_error(RefreshErrorKind::Rejected, "invalid_grant")),
        }
    }
}
