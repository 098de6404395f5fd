//! Persistence adapter for connected accounts.
//!
//! Two backends implement [`AccountStore`]: the durable Postgres store and a
//! process-local memory store. [`FallbackAccountStore`] pairs them so a failing
//! durable store degrades to memory per call instead of failing the caller.

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use sea_orm::DatabaseConnection;

use crate::connected_account::{AccountUpdate, ConnectedAccount};
use crate::error::Error;
use crate::Platform;

pub mod database;
pub mod fallback;
pub mod memory;

pub use database::DatabaseAccountStore;
pub use fallback::FallbackAccountStore;
pub use memory::MemoryAccountStore;

/// Keyed storage of connected accounts.
///
/// Lookups that find nothing return `Ok(None)` / `Ok(false)`; `Err` is reserved
/// for the backend itself failing.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<ConnectedAccount>, Error>;

    /// All accounts owned by `user_id`, oldest connection first.
    async fn get_all_for_user(&self, user_id: &str) -> Result<Vec<ConnectedAccount>, Error>;

    /// The earliest connected account for the pair, if any.
    async fn get_by_user_and_platform(
        &self,
        user_id: &str,
        platform: Platform,
    ) -> Result<Option<ConnectedAccount>, Error>;

    /// Insert the account, replacing any record with the same id.
    async fn put(&self, account: &ConnectedAccount) -> Result<(), Error>;

    /// Apply `update` to the account and return the result, or `None` if no
    /// account has that id.
    async fn update(
        &self,
        id: &str,
        update: &AccountUpdate,
    ) -> Result<Option<ConnectedAccount>, Error>;

    async fn delete(&self, id: &str) -> Result<bool, Error>;
}

/// Pick the store for this process.
///
/// With a live database connection the durable store is primary and `memory`
/// shadows it for the lifetime of the process; without one, `memory` is the
/// only store. Writes that land in memory during a database outage are not
/// copied back once it recovers.
pub fn select(db: Option<Arc<DatabaseConnection>>, memory: MemoryAccountStore) -> Arc<dyn AccountStore> {
    match db {
        Some(db) => {
            info!("Using the database account store with in-memory fallback");
            Arc::new(FallbackAccountStore::new(
                DatabaseAccountStore::new(db),
                memory,
            ))
        }
        None => {
            warn!("No database available; connected accounts will only be kept in memory");
            Arc::new(memory)
        }
    }
}
