//! Database migration command.

use hackhub_core::config::AppConfig;
use hackhub_core::error::AppError;

use crate::output;

/// Apply every pending migration
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let pool = super::connect(config).await?;

    println!("Running database migrations...");
    hackhub_database::migration::run_migrations(pool.pool()).await?;
    output::print_success("All migrations applied successfully.");

    pool.close().await;
    Ok(())
}
