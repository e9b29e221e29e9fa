/// PostgreSQL connection pool management
///
/// Every operation in TaskDesk runs independently against a shared
/// relational store through this bounded pool; there is no other
/// process-wide mutable state. The pool is created once at startup and
/// injected into each component explicitly.
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let pool = create_pool(&DatabaseConfig {
///     url: std::env::var("DATABASE_URL").unwrap_or_default(),
///     ..Default::default()
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Upper bound on open connections
    pub max_connections: u32,

    /// Idle connections kept warm
    pub min_connections: u32,

    /// How long a caller waits for a free connection (seconds)
    pub acquire_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout_seconds: 30,
        }
    }
}

/// Creates the connection pool and verifies the store is reachable
///
/// Startup is the only point where a store failure is fatal; afterwards
/// every store error is a recoverable per-call failure.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the database is unreachable,
/// or the health probe fails.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "creating database connection pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .connect(&config.url)
        .await?;

    health_check(&pool).await?;

    info!("database connection pool ready");
    Ok(pool)
}

/// Probes the store with a trivial query
///
/// # Errors
///
/// Returns an error if the probe cannot be executed.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    debug!("running database health check");

    let (probe,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;
    if probe != 1 {
        return Err(sqlx::Error::Protocol(
            "health check returned unexpected value".into(),
        ));
    }

    Ok(())
}

/// Closes the pool during shutdown
pub async fn close_pool(pool: PgPool) {
    info!("closing database connection pool");
    pool.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.acquire_timeout_seconds, 30);
        assert!(config.url.is_empty());
    }
}
