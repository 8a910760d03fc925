//! Cross-cutting layers: CORS and slow request logging.

use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, warn};

use crate::config::Config;

/// Permissive CORS unless `CORS_ALLOWED_ORIGINS` lists specific origins.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new().allow_headers(Any).allow_methods(Any);
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

/// Log every request at debug, and at warn when it took longer than the threshold.
pub async fn log_slow_requests(
    State(threshold): State<Duration>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let elapsed = started.elapsed();
    let status = response.status().as_u16();
    if elapsed > threshold {
        warn!(
            %method,
            %path,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Slow request"
        );
    } else {
        debug!(%method, %path, status, elapsed_ms = elapsed.as_millis() as u64, "Request handled");
    }

    response
}
