//! Health endpoints
//!
//! - `GET /health` is a liveness probe and always answers 200.
//! - `GET /health/detailed` runs every registered [`HealthCheck`] and answers
//!   503 if any of them fails.

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

/// A dependency probe, e.g. a database ping.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self) -> std::result::Result<(), String>;
}

/// Outcome of one [`HealthCheck`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub name: String,
    pub healthy: bool,
    pub latency_ms: u64,
    pub error: Option<String>,
}

/// Shared state for the health routes, usually held in an `Arc`.
#[derive(Clone)]
pub struct HealthState {
    pub service_name: String,
    pub start_time: Instant,
    checks: Vec<Arc<dyn HealthCheck>>,
}

impl HealthState {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            start_time: Instant::now(),
            checks: Vec::new(),
        }
    }

    pub fn with_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.checks.push(check);
        self
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Run every check in registration order.
    pub async fn run_checks(&self) -> Vec<ComponentStatus> {
        let mut statuses = Vec::with_capacity(self.checks.len());

        for check in &self.checks {
            let start = Instant::now();
            let result = check.check().await;
            let latency_ms = start.elapsed().as_millis() as u64;

            if let Err(ref e) = result {
                tracing::warn!(component = check.name(), error = %e, "Health check failed");
            }

            statuses.push(ComponentStatus {
                name: check.name().to_string(),
                healthy: result.is_ok(),
                latency_ms,
                error: result.err(),
            });
        }

        statuses
    }
}

pub async fn health_handler(State(state): State<Arc<HealthState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": state.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
    }))
}

pub async fn detailed_health_handler(
    State(state): State<Arc<HealthState>>,
) -> (StatusCode, Json<Value>) {
    let components = state.run_checks().await;

    let all_healthy = components.iter().all(|c| c.healthy);
    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let health = json!({
        "status": if all_healthy { "healthy" } else { "degraded" },
        "service": state.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
        "components": components,
        "healthy": all_healthy,
    });

    (status_code, Json(health))
}

pub fn health_routes(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/health/detailed", get(detailed_health_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    struct FixedCheck {
        name: &'static str,
        result: std::result::Result<(), String>,
    }

    #[async_trait]
    impl HealthCheck for FixedCheck {
        fn name(&self) -> &str {
            self.name
        }

        async fn check(&self) -> std::result::Result<(), String> {
            self.result.clone()
        }
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_run_checks_in_order() {
        let state = HealthState::new("climate-api")
            .with_check(Arc::new(FixedCheck { name: "a", result: Ok(()) }))
            .with_check(Arc::new(FixedCheck {
                name: "b",
                result: Err("down".to_string()),
            }));

        let statuses = state.run_checks().await;
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].name, "a");
        assert!(statuses[0].healthy);
        assert_eq!(statuses[1].error.as_deref(), Some("down"));
    }

    #[tokio::test]
    async fn test_liveness_ignores_checks() {
        let state = HealthState::new("climate-api").with_check(Arc::new(FixedCheck {
            name: "database",
            result: Err("unreachable".to_string()),
        }));

        let (status, body) = get_json(health_routes(Arc::new(state)), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "climate-api");
    }

    #[tokio::test]
    async fn test_detailed_reports_failure() {
        let state = HealthState::new("climate-api").with_check(Arc::new(FixedCheck {
            name: "database",
            result: Err("unreachable".to_string()),
        }));

        let (status, body) = get_json(health_routes(Arc::new(state)), "/health/detailed").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["components"][0]["name"], "database");
        assert_eq!(body["components"][0]["healthy"], false);
    }

    #[tokio::test]
    async fn test_detailed_healthy_without_checks() {
        let state = HealthState::new("climate-api");
        let (status, body) = get_json(health_routes(Arc::new(state)), "/health/detailed").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["healthy"], true);
    }
}
