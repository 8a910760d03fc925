//! Route handlers for the HTTP API.

pub mod chat;
pub mod health;
pub mod history;
pub mod settings;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use crate::middleware::{cors_layer, log_slow_requests};
use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/chat", post(chat::chat))
        .route("/api/historico", get(history::list_history))
        .route(
            "/api/settings",
            get(settings::get_settings).post(settings::save_settings),
        )
        // Health checks
        .route("/api/health", get(health::health))
        .route("/healthz", get(health::liveness))
}

/// Full application: routes, static frontend fallback and middleware.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    router()
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(axum::middleware::from_fn_with_state(
            config.slow_request,
            log_slow_requests,
        ))
        .layer(cors_layer(&config))
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use analyzer::{AnalysisService, AnalyzerConfig, HistoryWorker, HistoryWriter};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use axum::Router;
    use completion_core::{CompletionProvider, RetryPolicy};
    use database::Database;
    use tower::ServiceExt;

    use super::app;
    use crate::config::Config;
    use crate::state::AppState;

    const BODY_LIMIT: usize = 1024 * 1024;

    pub struct TestApp {
        pub router: Router,
        pub db: Database,
        pub worker: HistoryWorker,
    }

    pub async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    /// App with the given provider, or with no provider configured.
    pub async fn test_app(provider: Option<Arc<dyn CompletionProvider>>) -> TestApp {
        test_app_with_timeout(provider, Duration::from_secs(90)).await
    }

    /// Like [`test_app`], with a custom per-attempt provider timeout.
    pub async fn test_app_with_timeout(
        provider: Option<Arc<dyn CompletionProvider>>,
        openai_timeout: Duration,
    ) -> TestApp {
        let db = test_db().await;
        let (writer, worker) = HistoryWriter::spawn(db.clone(), 16);
        let analyzer = provider.map(|provider| {
            let config = AnalyzerConfig::builder()
                .retry(RetryPolicy::new(2, Duration::ZERO))
                .build();
            Arc::new(AnalysisService::new(provider, config, writer))
        });

        let config = Config {
            static_dir: std::env::temp_dir().join("analysis-gateway-no-static"),
            ..Config::default()
        };
        let state = AppState::new(db.clone(), analyzer, config, openai_timeout);

        TestApp {
            router: app(state),
            db,
            worker,
        }
    }

    pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, json_body(response).await)
    }

    pub async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
        if bytes.is_empty() {
            return serde_json::Value::Null;
        }
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;

    #[tokio::test]
    async fn test_unknown_path_falls_through_to_static() {
        let app = test_app(None).await;
        let (status, _) = send(&app.router, get("/nope.html")).await;
        assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_preflight_allowed() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let app = test_app(None).await;
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/chat")
            .header("origin", "https://example.org")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();
        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }
}
