//! HTTP API: service calls, host configuration, and the setup wizard.

mod handlers;
mod state;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/services", get(handlers::list_services))
        .route("/api/services/{domain}/{service}", post(handlers::call_service))
        .route("/api/config", get(handlers::config))
        .route("/api/config/config_entries", get(handlers::config_entries))
        .route("/api/config/config_entries/flow", post(handlers::config_flow))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, state: Arc<AppState>) -> std::io::Result<()> {
    let app = build_router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("Arvee listening on http://{}", addr);

    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::Executor;
    use crate::host::Host;
    use crate::lookup::{BackendKind, SelectedBackend, TimezoneLookup};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct Denver;

    impl TimezoneLookup for Denver {
        fn kind(&self) -> BackendKind {
            BackendKind::Custom
        }

        fn resolve(&self, latitude: f64, longitude: f64) -> Option<String> {
            ((latitude, longitude) == (40.0, -105.0)).then(|| "America/Denver".to_string())
        }
    }

    fn app(with_backend: bool) -> (Router, Arc<AppState>, TempDir) {
        let dir = TempDir::new().unwrap();
        let host = Host::open(dir.path(), Executor::new(1, None));
        let backend = with_backend.then(|| SelectedBackend::new(Arc::new(Denver)));
        crate::setup(&host, backend.clone());
        let state = Arc::new(AppState { host, backend });
        (build_router(Arc::clone(&state)), state, dir)
    }

    async fn send(router: Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_set_geo_timezone_over_http() {
        let (router, state, _dir) = app(true);
        let (status, body) = send(
            router,
            "POST",
            "/api/services/arvee/set_geo_timezone",
            json!({"latitude": 40.0, "longitude": -105.0}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
        assert_eq!(state.host.config.time_zone().await, "America/Denver");
    }

    #[tokio::test]
    async fn test_resolution_error_status() {
        let (router, state, _dir) = app(true);
        let (status, body) = send(
            router,
            "POST",
            "/api/services/arvee/set_geo_timezone",
            json!({"latitude": 0.0, "longitude": -160.0}),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("Could not determine timezone"));
        assert_eq!(state.host.config.time_zone().await, "UTC");
    }

    #[tokio::test]
    async fn test_invalid_input_status() {
        let (router, _state, _dir) = app(true);
        let (status, _) = send(
            router,
            "POST",
            "/api/services/arvee/set_geo_timezone",
            json!({"latitude": 100.0, "longitude": 0.0}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_zone_status() {
        let (router, _state, _dir) = app(true);
        let (status, body) = send(
            router,
            "POST",
            "/api/services/arvee/set_timezone",
            json!({"timezone": "Nowhere/Special"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Nowhere/Special"));
    }

    #[tokio::test]
    async fn test_services_missing_without_backend() {
        let (router, _state, _dir) = app(false);
        let (status, _) = send(
            router.clone(),
            "POST",
            "/api/services/arvee/set_timezone",
            json!({"timezone": "UTC"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(router, "GET", "/api/config", Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["backend"], Value::Null);
    }

    #[tokio::test]
    async fn test_config_flow_over_http() {
        let (router, state, _dir) = app(true);
        let (status, body) = send(
            router.clone(),
            "POST",
            "/api/config/config_entries/flow",
            json!({"user_input": {}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "create_entry");
        assert_eq!(body["title"], "Arvee");
        assert_eq!(state.host.entries.entries().await.len(), 1);

        let (_, body) = send(router, "GET", "/api/config/config_entries", Value::Null).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_config_flow_cannot_connect() {
        let (router, _state, _dir) = app(false);
        let (_, body) = send(
            router,
            "POST",
            "/api/config/config_entries/flow",
            json!({"user_input": {}}),
        )
        .await;
        assert_eq!(body["type"], "form");
        assert_eq!(body["errors"]["base"], "cannot_connect");
    }
}
