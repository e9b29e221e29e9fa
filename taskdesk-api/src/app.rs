/// Application state and router builder
///
/// Defines the shared application state and assembles the axum router:
/// a public health check plus the named-operation surface under `/ops`,
/// every operation behind the bearer-credential middleware.
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                    # Health check (public)
/// └── /ops/                      # Named operations (authenticated)
///     ├── POST /create_user
///     ├── POST /generate_token
///     ├── POST /get_token_info
///     ├── POST /list_users
///     ├── POST /create_task
///     ├── POST /complete_task
///     ├── POST /cancel_task
///     ├── POST /wait_for_user
///     ├── POST /get_next_task
///     └── POST /list_created_tasks
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Request tracing (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Bearer authentication (ops routes only)

use crate::config::Config;
use crate::error::OpError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;
use taskdesk_shared::auth::middleware::authenticate;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request via axum's `State` extractor; the config rides in an
/// `Arc` so clones stay cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Signing key for credential operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Configured credential lifetime
    pub fn token_ttl(&self) -> Duration {
        Duration::hours(self.config.jwt.token_ttl_hours)
    }
}

/// Builds the complete axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let ops_routes = Router::new()
        .route("/create_user", post(routes::ops::create_user::create_user))
        .route(
            "/generate_token",
            post(routes::ops::generate_token::generate_token),
        )
        .route(
            "/get_token_info",
            post(routes::ops::token_info::get_token_info),
        )
        .route("/list_users", post(routes::ops::list_users::list_users))
        .route("/create_task", post(routes::ops::create_task::create_task))
        .route(
            "/complete_task",
            post(routes::ops::complete_task::complete_task),
        )
        .route("/cancel_task", post(routes::ops::cancel_task::cancel_task))
        .route(
            "/wait_for_user",
            post(routes::ops::wait_for_user::wait_for_user),
        )
        .route(
            "/get_next_task",
            post(routes::ops::get_next_task::get_next_task),
        )
        .route(
            "/list_created_tasks",
            post(routes::ops::list_created_tasks::list_created_tasks),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/ops", ops_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Bearer authentication middleware
///
/// Validates the credential from the Authorization header and injects an
/// `AuthContext` into request extensions. Failures render through
/// `OpError`, so an unauthenticated call still receives the uniform
/// `{"error": ...}` payload rather than a transport fault.
async fn bearer_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, OpError> {
    let ctx = authenticate(req.headers(), state.jwt_secret())?;
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}
