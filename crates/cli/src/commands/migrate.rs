//! Database migration command.
//!
//! Migrations live in `crates/api/migrations/` and are embedded into the
//! API crate at build time, so this command and `API_RUN_MIGRATIONS=true`
//! apply the same set.

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), super::CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    ecommerce_api::db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
