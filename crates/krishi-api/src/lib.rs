//! Krishi API crate - axum HTTP server and route handlers.
//!
//! Exposes the chat engine over REST: message handling, session listing,
//! transcripts, model status, vocabularies, and health checks.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
