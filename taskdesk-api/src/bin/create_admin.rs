//! Admin bootstrap binary
//!
//! Idempotently ensures the `admin` user exists and prints a fresh
//! credential for it. Run once against a new deployment to obtain the
//! first usable token:
//!
//! ```bash
//! cargo run -p taskdesk-api --bin taskdesk-create-admin
//! ```

use chrono::Duration;
use taskdesk_api::config::Config;
use taskdesk_shared::auth::jwt::{create_token, Claims};
use taskdesk_shared::db::{migrations, pool};
use taskdesk_shared::models::user::{CreateUser, User};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let db = pool::create_pool(&config.pool_config()).await?;
    migrations::run_migrations(&db).await?;

    let admin = User::find_or_create(
        &db,
        CreateUser {
            name: "admin".to_string(),
            is_admin: true,
        },
    )
    .await?;

    let claims = Claims::with_ttl(admin.id, true, Duration::hours(config.jwt.token_ttl_hours));
    let token = create_token(&claims, &config.jwt.secret)?;

    println!("=== Initial Admin Credentials ===");
    println!("User ID: {}", admin.id);
    println!("Name:    {}", admin.name);
    println!("Token:   {}", token);

    pool::close_pool(db).await;
    Ok(())
}
