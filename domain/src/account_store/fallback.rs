use async_trait::async_trait;
use log::warn;

use super::AccountStore;
use crate::connected_account::{AccountUpdate, ConnectedAccount};
use crate::error::Error;
use crate::Platform;

/// Runs every operation on `primary`; when that fails, logs and runs the same
/// operation on `secondary` for that call only. A `secondary` failure is returned.
pub struct FallbackAccountStore<P, S> {
    primary: P,
    secondary: S,
}

impl<P: AccountStore, S: AccountStore> FallbackAccountStore<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

macro_rules! with_fallback {
    ($self:ident, $op:ident($($arg:expr),*)) => {
        match $self.primary.$op($($arg),*).await {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(
                    "Primary account store failed on {}, using fallback store: {}",
                    stringify!($op),
                    err
                );
                $self.secondary.$op($($arg),*).await
            }
        }
    };
}

#[async_trait]
impl<P: AccountStore, S: AccountStore> AccountStore for FallbackAccountStore<P, S> {
    async fn get(&self, id: &str) -> Result<Option<ConnectedAccount>, Error> {
        with_fallback!(self, get(id))
    }

    async fn get_all_for_user(&self, user_id: &str) -> Result<Vec<ConnectedAccount>, Error> {
        with_fallback!(self, get_all_for_user(user_id))
    }

    async fn get_by_user_and_platform(
        &self,
        user_id: &str,
        platform: Platform,
    ) -> Result<Option<ConnectedAccount>, Error> {
        with_fallback!(self, get_by_user_and_platform(user_id, platform))
    }

    async fn put(&self, account: &ConnectedAccount) -> Result<(), Error> {
        with_fallback!(self, put(account))
    }

    async fn update(
        &self,
        id: &str,
        update: &AccountUpdate,
    ) -> Result<Option<ConnectedAccount>, Error> {
        with_fallback!(self, update(id, update))
    }

    async fn delete(&self, id: &str) -> Result<bool, Error> {
        with_fallback!(self, delete(id))
    }
}
