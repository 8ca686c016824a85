//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression, a body
//! limit, and the per-second rate limiter around the chat routes.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::rate_limit::RateLimiter;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS: allow localhost origins on the configured port so a local web
    // chat surface can call the API directly.
    let port = state.config.general.port;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([
            format!("http://127.0.0.1:{}", port)
                .parse::<HeaderValue>()
                .unwrap(),
            format!("http://localhost:{}", port)
                .parse::<HeaderValue>()
                .unwrap(),
        ]))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let public_routes = Router::new().route("/health", get(handlers::health));

    let limiter = RateLimiter::new(state.config.general.rate_limit_per_sec);

    let chat_routes = Router::new()
        .route("/chat", post(handlers::chat))
        .route("/chat/sessions", get(handlers::list_sessions))
        .route(
            "/chat/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/chat/sessions/{id}/history", get(handlers::get_history))
        .route("/models", get(handlers::models))
        .route("/vocabulary/{kind}", get(handlers::vocabulary))
        .layer(axum::middleware::from_fn(
            crate::rate_limit::rate_limit_middleware,
        ))
        .layer(axum::Extension(limiter));

    public_routes
        .merge(chat_routes)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
