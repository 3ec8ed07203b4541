use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

use crate::config::DatabaseConfig;

fn connect_options(cfg: &DatabaseConfig) -> ConnectOptions {
    let mut opt = ConnectOptions::new(cfg.url.clone());

    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    opt
}

/// Sync the schema, then open the shared pool.
///
/// Schema sync runs over its own single connection, which is closed before
/// the pool is opened. SQLite connections keep the schema they loaded, so a
/// pooled connection opened before the composite unique keys existed would
/// reject `ON CONFLICT` targets on them.
pub async fn init_db(cfg: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut schema_opt = connect_options(cfg);
    schema_opt.max_connections(1).min_connections(1);

    let schema_db = Database::connect(schema_opt).await?;
    schema_db
        .get_schema_registry("quiz_server::entity::*")
        .sync(&schema_db)
        .await?;
    schema_db.close().await?;
    info!("Database schema is up to date");

    Database::connect(connect_options(cfg)).await
}
