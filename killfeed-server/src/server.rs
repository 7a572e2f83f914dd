//! Axum server exposing the `/health` endpoint.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use killfeed_core::health::{HealthReport, HealthReporter, HealthStatus};
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub fn build_router(health: HealthReporter) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(health)
}

/// 200 while every tracked activity is recent, 503 otherwise.
async fn health_check(State(health): State<HealthReporter>) -> (StatusCode, Json<HealthReport>) {
    let report = health.check();
    let status = match report.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(report))
}

/// Serve until the listener fails. The process exits on a shutdown signal,
/// so no graceful shutdown is wired here.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Health endpoint listening on {}", addr);

    axum::serve(listener, router).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_fresh_process_is_healthy() {
        let app = build_router(HealthReporter::new(true));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["details"]["redisq"]["status"], "healthy");
        assert!(json["details"]["esi"]["lastCall"].is_i64());
        assert!(json["details"]["slack"]["lastPost"].is_i64());
    }

    #[tokio::test]
    async fn test_slack_omitted_without_webhook() {
        let app = build_router(HealthReporter::new(false));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["details"]["slack"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = build_router(HealthReporter::new(false));

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
