use std::sync::Arc;

use async_trait::async_trait;
use entity::connected_accounts::{ActiveModel, Model};
use entity_api::connected_account;
use log::debug;
use sea_orm::{ActiveValue::Set, DatabaseConnection};
use secrecy::ExposeSecret;

use super::AccountStore;
use crate::connected_account::{AccountUpdate, ConnectedAccount};
use crate::error::Error;
use crate::Platform;

/// Account store backed by the `repurpose.connected_accounts` table.
#[derive(Clone)]
pub struct DatabaseAccountStore {
    db: Arc<DatabaseConnection>,
}

impl DatabaseAccountStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// Columns named by `update`; everything else stays `NotSet` so a concurrent
/// write to other columns is never overwritten.
fn changed_columns(update: &AccountUpdate) -> ActiveModel {
    let mut changes = ActiveModel::default();
    if let Some(tokens) = &update.tokens {
        changes.access_token = Set(tokens.access_token.expose_secret().clone());
        changes.refresh_token = Set(tokens
            .refresh_token
            .as_ref()
            .map(|rt| rt.expose_secret().clone()));
        changes.token_expires_at = Set(tokens.expires_at.into());
        changes.token_type = Set(tokens.token_type.clone());
        changes.scope = Set(tokens.scope.clone());
    }
    if let Some(is_active) = update.is_active {
        changes.is_active = Set(is_active);
    }
    if let Some(last_used_at) = update.last_used_at {
        changes.last_used_at = Set(Some(last_used_at.into()));
    }
    changes
}

#[async_trait]
impl AccountStore for DatabaseAccountStore {
    async fn get(&self, id: &str) -> Result<Option<ConnectedAccount>, Error> {
        connected_account::find_by_id(&self.db, id)
            .await?
            .map(ConnectedAccount::try_from)
            .transpose()
    }

    async fn get_all_for_user(&self, user_id: &str) -> Result<Vec<ConnectedAccount>, Error> {
        connected_account::find_by_user(&self.db, user_id)
            .await?
            .into_iter()
            .map(ConnectedAccount::try_from)
            .collect()
    }

    async fn get_by_user_and_platform(
        &self,
        user_id: &str,
        platform: Platform,
    ) -> Result<Option<ConnectedAccount>, Error> {
        connected_account::find_by_user_and_platform(&self.db, user_id, platform.as_str())
            .await?
            .map(ConnectedAccount::try_from)
            .transpose()
    }

    async fn put(&self, account: &ConnectedAccount) -> Result<(), Error> {
        Ok(connected_account::upsert(&self.db, Model::from(account)).await?)
    }

    async fn update(
        &self,
        id: &str,
        update: &AccountUpdate,
    ) -> Result<Option<ConnectedAccount>, Error> {
        match connected_account::update_columns(&self.db, id, changed_columns(update)).await? {
            Some(model) => Ok(Some(ConnectedAccount::try_from(model)?)),
            None => {
                debug!("No connected account {id} to update");
                Ok(None)
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, Error> {
        Ok(connected_account::delete_by_id(&self.db, id).await?)
    }
}
