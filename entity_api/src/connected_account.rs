use super::error::Error;
use entity::connected_accounts::{ActiveModel, Column, Entity, Model};
use log::debug;
use sea_orm::{
    entity::prelude::*,
    sea_query::OnConflict,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, QueryOrder,
};

/// Inserts a connected account, or replaces every column of the existing row
/// with the same id, in a single statement
pub async fn upsert(db: &DatabaseConnection, model: Model) -> Result<(), Error> {
    debug!(
        "Upserting connected account {} for user_id: {}, platform: {}",
        model.id, model.user_id, model.platform
    );

    let active_model = ActiveModel {
        id: Set(model.id),
        user_id: Set(model.user_id),
        platform: Set(model.platform),
        platform_user_id: Set(model.platform_user_id),
        platform_username: Set(model.platform_username),
        profile_image_url: Set(model.profile_image_url),
        access_token: Set(model.access_token),
        refresh_token: Set(model.refresh_token),
        token_expires_at: Set(model.token_expires_at),
        token_type: Set(model.token_type),
        scope: Set(model.scope),
        is_active: Set(model.is_active),
        connected_at: Set(model.connected_at),
        last_used_at: Set(model.last_used_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Entity::insert(active_model)
        .on_conflict(
            OnConflict::column(Column::Id)
                .update_columns([
                    Column::UserId,
                    Column::Platform,
                    Column::PlatformUserId,
                    Column::PlatformUsername,
                    Column::ProfileImageUrl,
                    Column::AccessToken,
                    Column::RefreshToken,
                    Column::TokenExpiresAt,
                    Column::TokenType,
                    Column::Scope,
                    Column::IsActive,
                    Column::ConnectedAt,
                    Column::LastUsedAt,
                    Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(())
}

/// Finds a connected account by its id
pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find_by_id(id.to_string()).one(db).await?)
}

/// Finds all connected accounts owned by a user, oldest connection first
pub async fn find_by_user(db: &DatabaseConnection, user_id: &str) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_asc(Column::ConnectedAt)
        .all(db)
        .await?)
}

/// Finds the first connected account for a user and platform.
/// Uniqueness of the pair is not enforced; the oldest connection wins.
pub async fn find_by_user_and_platform(
    db: &DatabaseConnection,
    user_id: &str,
    platform: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::Platform.eq(platform))
        .order_by_asc(Column::ConnectedAt)
        .one(db)
        .await?)
}

/// Writes only the columns that are `Set` in `changes` to the row `id`, in one
/// `UPDATE`. Columns left `NotSet` keep whatever the database currently holds.
/// Returns `None` when no row has that id.
pub async fn update_columns(
    db: &DatabaseConnection,
    id: &str,
    mut changes: ActiveModel,
) -> Result<Option<Model>, Error> {
    debug!("Updating connected account: {id}");

    changes.id = Unchanged(id.to_string());
    changes.updated_at = Set(chrono::Utc::now().into());

    match changes.update(db).await {
        Ok(model) => Ok(Some(model)),
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Deletes a connected account by id (disconnect). Returns whether a row was removed.
pub async fn delete_by_id(db: &DatabaseConnection, id: &str) -> Result<bool, Error> {
    let result = Entity::delete_by_id(id.to_string()).exec(db).await?;
    debug!("Deleted connected account {id}: {} row(s)", result.rows_affected);
    Ok(result.rows_affected > 0)
}
