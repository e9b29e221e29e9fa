//! # TaskDesk API Server
//!
//! Serves the TaskDesk named-operation surface: tasks assigned between
//! users, guarded by bearer credentials, over a thin HTTP transport.
//!
//! ## Startup sequence
//!
//! 1. Initialize tracing
//! 2. Load configuration from the environment (fail fast on bad config)
//! 3. Create the database pool and verify connectivity
//! 4. Apply pending migrations
//! 5. Serve until a shutdown signal arrives
//!
//! Startup is the only point where infrastructure failure terminates the
//! process; afterwards every failure is a structured per-call error.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskdesk-api
//! ```

use taskdesk_api::app::{build_router, AppState};
use taskdesk_api::config::Config;
use taskdesk_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdesk_api=debug,taskdesk_shared=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskDesk API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(&config.pool_config()).await?;
    migrations::run_migrations(&db).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(db.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("server stopped");

    Ok(())
}

/// Resolves when the process receives Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
