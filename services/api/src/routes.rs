use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use hiring_ai::workflows::positions::{position_router, PositionRepository};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_position_routes<R>(repository: Arc<R>) -> axum::Router
where
    R: PositionRepository + 'static,
{
    position_router(repository)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryPositionRepository;
    use crate::seed::seed_positions;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let repository = Arc::new(
            InMemoryPositionRepository::new("Madrid")
                .with_positions(seed_positions())
                .expect("seeded"),
        );
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_position_routes(repository).layer(Extension(state))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&body).expect("json payload"))
    }

    #[tokio::test]
    async fn readiness_reflects_the_flag() {
        let (status, payload) = get(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload["status"], "initializing");

        let (status, payload) = get(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "ready");
    }

    #[tokio::test]
    async fn seeded_positions_are_browsable() {
        let (status, payload) = get(app(true), "/api/v1/positions?city=Barcelona").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["count"], 5);
        assert_eq!(payload["positions"][0]["title"], "Prueba Camarero/a");

        let (status, payload) = get(app(true), "/api/v1/positions/6").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["title"], "Sous Chef");
        assert_eq!(payload["status"], "closed");
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let (status, payload) = get(app(false), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "ok");
    }
}
