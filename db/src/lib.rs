pub mod filters;
pub mod models;
pub mod repositories;
pub mod test_utils;

use sea_orm::{Database, DatabaseConnection, DbErr};
use std::path::Path;
use util::config;

/// Opens the configured database (`DATABASE_PATH`, a DSN or a SQLite file path).
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    // SQLite won't create intermediate dirs.
    if let Some(parent) = config::database_file().as_deref().and_then(Path::parent) {
        let _ = std::fs::create_dir_all(parent);
    }

    let url = config::database_url();
    tracing::info!(url = %url, "Connecting to database");
    Database::connect(&url).await
}
