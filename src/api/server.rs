//! HTTP API server

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{require_auth, PasswordHasher, TokenService};
use crate::config::Config;
use crate::db::Database;
use crate::error::Result;

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub db: Database,
    pub tokens: TokenService,
    pub passwords: PasswordHasher,
}

impl AppState {
    /// Build state from config, opening the configured database
    pub fn from_config(config: &Config) -> Result<Self> {
        let db = Database::open(&config.database)?;
        Ok(Self::with_database(config, db))
    }

    pub fn with_database(config: &Config, db: Database) -> Self {
        let tokens = TokenService::from_config(&config.auth);
        let passwords = PasswordHasher::new(config.auth.bcrypt_cost);
        Self {
            db,
            tokens,
            passwords,
        }
    }
}

pub type SharedState = Arc<AppState>;

/// Run the HTTP API server
pub async fn run_server(config: Config) -> Result<()> {
    config.validate()?;
    if config.auth.secret().is_none() {
        tracing::warn!("No jwt_secret configured; logins will fail until one is set");
    }
    if config.auth.token_ttl().is_none() {
        tracing::warn!("Token expiry is disabled; issued tokens never expire");
    }

    let addr = config.bind_addr();
    let state = Arc::new(AppState::from_config(&config)?);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    serve(listener, state).await
}

/// Serve the API on an already-bound listener
pub async fn serve(listener: TcpListener, state: SharedState) -> Result<()> {
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let protected = Router::new()
        .route("/protected", get(routes::protected))
        .route("/user-info", get(routes::user_info))
        .route("/students", get(routes::list_students).post(routes::create_student))
        .route("/students/{id}", get(routes::get_student))
        .route(
            "/students/{id}/courses/{course_id}",
            post(routes::enroll_student),
        )
        .route("/courses", get(routes::list_courses).post(routes::create_course))
        .route("/courses/{id}/students", get(routes::course_students))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/register", post(routes::register))
        .route("/login", post(routes::login))
        .merge(protected)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
