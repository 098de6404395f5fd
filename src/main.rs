use std::error::Error;
use std::sync::Arc;

use domain::account_registry::AccountRegistry;
use domain::account_store::{self, MemoryAccountStore};
use domain::platforms;
use domain::token_service::TokenService;
use log::*;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use service::{config::Config, logging::Logger};
use web::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = Config::new();
    Logger::init_logger(&config)?;

    info!("Starting up the connected-account token service");

    let db = connect_durable_store(&config).await;
    let store = account_store::select(db, MemoryAccountStore::new());

    let refresher = platforms::token_client_from_config(&config)?;
    let token_service = TokenService::new(AccountRegistry::new(store), Arc::new(refresher));

    let app_state = AppState::new(config, Arc::new(token_service));
    web::init_server(app_state).await?;

    Ok(())
}

/// Connect to and migrate the durable store. Any failure leaves the process
/// running on the memory store alone.
async fn connect_durable_store(config: &Config) -> Option<Arc<DatabaseConnection>> {
    let Some(database_url) = config.database_url() else {
        info!("DATABASE_URL not set");
        return None;
    };

    let db = match service::init_database(config, database_url).await {
        Ok(db) => db,
        Err(err) => {
            warn!("Could not connect to the account database: {err}");
            return None;
        }
    };

    if let Err(err) = Migrator::up(&db, None).await {
        warn!("Could not migrate the account database: {err}");
        return None;
    }

    Some(Arc::new(db))
}
