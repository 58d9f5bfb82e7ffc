//! Pitchside Gateway Library
//!
//! HTTP front door of the Pitchside tournament manager:
//!
//! - **Guarded navigation**: every page request is resolved against the
//!   application route table and passed through the role guard
//! - **Session endpoints**: login (credential exchange with the backend and
//!   the `token` cookie), logout and the current derived session
//! - **Health**: liveness and version information
//!
//! ## Modules
//!
//! - [`auth`]: login/logout/session handlers and the session middleware
//! - [`backend_client`]: HTTP client for the tournament backend
//! - [`config`]: configuration from file and environment
//! - [`error`]: error types with Axum integration
//! - [`handlers`]: health and navigation handlers
//! - [`state`]: shared application state

pub mod auth;
pub mod backend_client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod result_ext;
pub mod state;

pub use error::{AppError, AppResult};
pub use result_ext::ResultExt;

use axum::{
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsConfig;
use crate::state::AppState;

/// Build the gateway router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    // Public routes (no session needed)
    let health_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::api_health));

    let auth_routes = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::session));

    Router::new()
        .merge(health_routes)
        .merge(auth_routes)
        .fallback(handlers::navigate)
        .layer(middleware::from_fn(auth::middleware::session_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    tracing::info!("CORS allowed origins: {:?}", config.allowed_origins);

    // `*` cannot go through AllowOrigin::list, and tower-http refuses
    // credentials alongside a wildcard origin.
    let (allow_origin, allow_credentials) = if config.allows_any_origin() {
        if config.allow_credentials {
            tracing::warn!("CORS wildcard origin configured; credentials disabled");
        }
        (AllowOrigin::any(), false)
    } else {
        let allowed_origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        (AllowOrigin::list(allowed_origins), config.allow_credentials)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(allow_credentials)
}
