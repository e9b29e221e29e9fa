/// Database migration runner
///
/// Migrations are plain SQL files in the `migrations/` directory at the
/// workspace root, embedded at compile time and applied at startup. sqlx
/// tracks applied versions in its own `_sqlx_migrations` table, so running
/// the server against an up-to-date schema is a no-op.

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Applies all pending migrations
///
/// # Errors
///
/// Returns an error if a migration fails to apply; a failure aborts
/// startup rather than leaving a half-migrated schema in service.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("running database migrations");

    match sqlx::migrate!("../migrations").run(pool).await {
        Ok(()) => {
            info!("database migrations up to date");
            Ok(())
        }
        Err(e) => {
            warn!("migration failed: {}", e);
            Err(e)
        }
    }
}
