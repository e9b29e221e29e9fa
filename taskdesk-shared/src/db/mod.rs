/// Database layer for TaskDesk
///
/// # Modules
///
/// - `pool`: bounded PostgreSQL connection pool with a startup health check
/// - `migrations`: embedded SQL migration runner

pub mod migrations;
pub mod pool;
