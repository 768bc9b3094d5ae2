use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::Settings;
use crate::store::StoreError;

pub type DbPool = SqlitePool;

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(database_url: &str) -> Result<DbPool, StoreError> {
  tracing::info!(database_url, "Initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("Database initialized successfully");

  Ok(pool)
}

/// Open the pool described by loaded settings
pub async fn connect(settings: &Settings) -> Result<DbPool, StoreError> {
  initialize_db(&settings.database_url).await
}
