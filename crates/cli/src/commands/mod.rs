//! Subcommand implementations.

pub mod migrate;
pub mod seed;

use ecommerce_api::config::{ConfigError, DatabaseConfig};
use ecommerce_api::db::{self, RepositoryError};
use sqlx::PgPool;

/// Errors surfaced by any subcommand.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Invalid seed data: {0}")]
    Seed(String),
}

/// Connect using the server's database settings.
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let config = DatabaseConfig::from_env()?;
    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&config.url).await?)
}
