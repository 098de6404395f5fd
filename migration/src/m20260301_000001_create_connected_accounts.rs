use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS repurpose")
            .await?;

        // One row per user-platform link. Account ids are minted by the OAuth callback
        // flow, so the primary key is an opaque string rather than a generated UUID.
        // (user_id, platform) is intentionally not unique; readers take the oldest row.
        let create_table_sql = r#"
            CREATE TABLE IF NOT EXISTS repurpose.connected_accounts (
                id VARCHAR(255) PRIMARY KEY,
                user_id VARCHAR(255) NOT NULL,

                platform VARCHAR(32) NOT NULL,
                platform_user_id VARCHAR(255) NOT NULL,
                platform_username VARCHAR(255) NOT NULL,
                profile_image_url TEXT,

                access_token TEXT NOT NULL,
                refresh_token TEXT,
                token_expires_at TIMESTAMPTZ NOT NULL,
                token_type VARCHAR(50) NOT NULL DEFAULT 'Bearer',
                scope TEXT,

                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                connected_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                last_used_at TIMESTAMPTZ,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_table_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_connected_accounts_user_platform
                 ON repurpose.connected_accounts(user_id, platform)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS repurpose.connected_accounts")
            .await?;

        Ok(())
    }
}
