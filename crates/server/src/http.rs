//! HTTP server implementation using Axum
//!
//! Every router handed to [`HttpServer::new`] is wrapped, outermost first, in
//! a `TraceLayer` request span, the request metrics middleware and (when
//! configured) a `TimeoutLayer`.

use async_trait::async_trait;
use axum::{
    extract::{MatchedPath, Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};
use observability::{RequestMetricsGuard, ServerMetrics};
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::traits::Server;

const UNMATCHED_ROUTE: &str = "unmatched";

#[derive(Clone)]
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
    running: Arc<AtomicBool>,
    bound_addr: Arc<RwLock<Option<SocketAddr>>>,
}

impl HttpServer {
    /// Create a new HTTP server serving `router` behind the standard layers.
    pub fn new(config: ServerConfig, router: Router) -> Self {
        let router = Self::layered(router, &config);
        Self {
            config,
            router,
            running: Arc::new(AtomicBool::new(false)),
            bound_addr: Arc::new(RwLock::new(None)),
        }
    }

    fn layered(router: Router, config: &ServerConfig) -> Router {
        let router = match config.request_timeout {
            Some(timeout) => router.layer(TimeoutLayer::new(timeout)),
            None => router,
        };

        router
            .layer(middleware::from_fn_with_state(
                ServerMetrics::new("http"),
                track_metrics,
            ))
            .layer(TraceLayer::new_for_http())
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The fully layered router (for testing or inspection)
    pub fn router(&self) -> &Router {
        &self.router
    }
}

/// Records one request against its route template, so `/temp/2017-01-01` and
/// `/temp/2017-02-01` share a series.
async fn track_metrics(
    State(metrics): State<ServerMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    let mut guard = RequestMetricsGuard::new(&metrics, route);
    let response = next.run(request).await;
    guard.set_status(response.status().as_u16());
    response
}

#[async_trait]
impl Server for HttpServer {
    fn name(&self) -> &str {
        "http"
    }

    fn address(&self) -> Option<SocketAddr> {
        *self.bound_addr.read()
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run(&self, shutdown_token: CancellationToken) -> Result<()> {
        let address = self.config.address();
        info!(%address, "Starting HTTP server");

        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port))
            .await
            .map_err(|e| ServerError::bind(address.clone(), e))?;

        let local_addr = listener.local_addr().map_err(ServerError::Io)?;
        *self.bound_addr.write() = Some(local_addr);

        info!(%local_addr, "HTTP server listening");
        self.running.store(true, Ordering::SeqCst);

        let result = axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(async move {
                shutdown_token.cancelled().await;
                info!("HTTP server received shutdown signal");
            })
            .await;

        self.running.store(false, Ordering::SeqCst);
        *self.bound_addr.write() = None;

        match result {
            Ok(()) => {
                info!("HTTP server shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!(%e, "HTTP server error");
                Err(ServerError::Io(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ServerExt;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_router() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    "late"
                }),
            )
    }

    #[tokio::test]
    async fn test_http_server_shutdown() {
        let server = HttpServer::new(ServerConfig::new("127.0.0.1", 0), test_router());
        let probe = server.clone();
        let (handle, token) = server.spawn();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(probe.is_running());
        assert!(probe.address().is_some());

        token.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(result.is_ok(), "Server should shutdown within timeout");
        assert!(!probe.is_running());
    }

    #[tokio::test]
    async fn test_bind_failure_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let server = HttpServer::new(ServerConfig::new("127.0.0.1", port), test_router());
        let result = server.run(CancellationToken::new()).await;

        assert!(matches!(result, Err(ServerError::BindError { .. })));
    }

    #[tokio::test]
    async fn test_layers_pass_through() {
        let server = HttpServer::new(ServerConfig::new("127.0.0.1", 0), test_router());

        let response = server
            .router()
            .clone()
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_timeout() {
        let config =
            ServerConfig::new("127.0.0.1", 0).with_request_timeout(Duration::from_secs(1));
        let server = HttpServer::new(config, test_router());

        let response = server
            .router()
            .clone()
            .oneshot(axum::http::Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn test_http_server_name() {
        let server = HttpServer::new(ServerConfig::new("127.0.0.1", 5000), Router::new());
        assert_eq!(server.name(), "http");
    }
}
