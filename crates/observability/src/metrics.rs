//! Prometheus metrics
//!
//! * `http_requests_total{server, route, status}` - completed requests
//! * `http_request_duration_seconds{server, route}` - latency histogram
//! * `http_requests_in_flight{server}` - requests currently being served

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Start the Prometheus exporter on `0.0.0.0:port`, serving `/metrics`.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Request metrics for one named server.
///
/// Recording is a no-op until a recorder is installed by [`init_metrics`].
#[derive(Debug, Clone)]
pub struct ServerMetrics {
    server_name: String,
}

impl ServerMetrics {
    pub fn new(server_name: &str) -> Self {
        Self {
            server_name: server_name.to_string(),
        }
    }

    /// Record a completed request against its matched route template.
    pub fn record_request(&self, route: &str, duration: Duration, status_code: u16) {
        counter!(
            "http_requests_total",
            "server" => self.server_name.clone(),
            "route" => route.to_string(),
            "status" => status_code.to_string()
        )
        .increment(1);

        histogram!(
            "http_request_duration_seconds",
            "server" => self.server_name.clone(),
            "route" => route.to_string()
        )
        .record(duration.as_secs_f64());
    }

    pub fn request_started(&self) {
        gauge!("http_requests_in_flight", "server" => self.server_name.clone()).increment(1.0);
    }

    pub fn request_finished(&self) {
        gauge!("http_requests_in_flight", "server" => self.server_name.clone()).decrement(1.0);
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }
}

/// Tracks one in-flight request and records it when dropped.
///
/// Dropping without [`set_status`](Self::set_status) records a 500, which is
/// what a handler that panicked or was cancelled looks like to the client.
pub struct RequestMetricsGuard {
    metrics: ServerMetrics,
    route: String,
    start: Instant,
    status_code: u16,
}

impl RequestMetricsGuard {
    pub fn new(metrics: &ServerMetrics, route: impl Into<String>) -> Self {
        metrics.request_started();
        Self {
            metrics: metrics.clone(),
            route: route.into(),
            start: Instant::now(),
            status_code: 500,
        }
    }

    pub fn set_status(&mut self, code: u16) {
        self.status_code = code;
    }
}

impl Drop for RequestMetricsGuard {
    fn drop(&mut self) {
        self.metrics.request_finished();
        self.metrics
            .record_request(&self.route, self.start.elapsed(), self.status_code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let metrics = ServerMetrics::new("http");
        assert_eq!(metrics.server_name(), "http");

        metrics.record_request("/api/v1.0/stations", Duration::from_millis(5), 200);

        let mut guard = RequestMetricsGuard::new(&metrics, "/api/v1.0/temp/:start");
        guard.set_status(400);
        drop(guard);
    }
}
