//! Fixed-window rate limiter middleware.
//!
//! Counts requests per one-second window with atomics and rejects the
//! overflow with 429. The limit comes from `[general] rate_limit_per_sec`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Shared state for the rate limiter.
#[derive(Clone)]
pub struct RateLimiter {
    max_per_sec: u64,
    window_start: Arc<AtomicU64>,
    served: Arc<AtomicU64>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_per_sec` requests per second.
    pub fn new(max_per_sec: u64) -> Self {
        Self {
            max_per_sec,
            window_start: Arc::new(AtomicU64::new(0)),
            served: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Whether the current request fits in this second's window.
    fn allow(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        if self.window_start.swap(now, Ordering::Relaxed) != now {
            // First request of a fresh window.
            self.served.store(1, Ordering::Relaxed);
            return true;
        }

        self.served.fetch_add(1, Ordering::Relaxed) < self.max_per_sec
    }
}

/// Axum middleware that enforces the rate limit.
pub async fn rate_limit_middleware(
    axum::extract::Extension(limiter): axum::extract::Extension<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.allow() {
        next.run(req).await
    } else {
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": "too_many_requests",
                "message": "Rate limit exceeded"
            })),
        )
            .into_response()
    }
}
