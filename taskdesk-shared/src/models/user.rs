/// User model and database operations
///
/// Users are created by admin action (or the bootstrap binary) and never
/// deleted. They hold no password: access is entirely through admin-issued
/// bearer credentials. The unique, human-readable name is how callers
/// refer to each other (task assignment resolves an assignee by name).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name TEXT NOT NULL UNIQUE,
///     is_admin BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     name: "alice".to_string(),
///     is_admin: false,
/// }).await?;
///
/// let found = User::find_by_name(&pool, "alice").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user id
    pub id: Uuid,

    /// Unique display name
    pub name: String,

    /// Role flag; admins may create users, issue tokens, and list other
    /// users' created tasks
    pub is_admin: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Unique display name
    pub name: String,

    /// Whether the new user gets the admin role
    pub is_admin: bool,
}

const USER_COLUMNS: &str = "id, name, is_admin, created_at, updated_at";

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the name is already taken (unique constraint)
    /// or the store fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let sql = format!(
            "INSERT INTO users (name, is_admin) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(data.name)
            .bind(data.is_admin)
            .fetch_one(pool)
            .await
    }

    /// Finds a user by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by exact name match
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE name = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Lists users ordered by name
    pub async fn list(pool: &PgPool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY name ASC LIMIT $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Finds a user by name, creating it when absent
    ///
    /// Used by the bootstrap binary; the insert tolerates a concurrent
    /// creation of the same name.
    pub async fn find_or_create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        sqlx::query(
            "INSERT INTO users (name, is_admin) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING",
        )
        .bind(&data.name)
        .bind(data.is_admin)
        .execute(pool)
        .await?;

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE name = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(&data.name)
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization() {
        let user = User {
            id: Uuid::new_v4(),
            name: "admin".to_string(),
            is_admin: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["name"], "admin");
        assert_eq!(json["is_admin"], true);
    }
}
