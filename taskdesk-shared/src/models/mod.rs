/// Database models for TaskDesk
///
/// Each model owns its SQL: row structs derive `sqlx::FromRow` and expose
/// static async operations over a `PgPool`.
///
/// # Models
///
/// - `user`: user accounts referenced by tasks
/// - `task`: the task aggregate root and its lifecycle state machine
/// - `comment`: the append-only comment ledger owned by a task

pub mod comment;
pub mod task;
pub mod user;
