//! Logging and metrics for the climate API
//!
//! - Structured logging via `tracing`, in pretty, JSON or compact form
//! - A Prometheus exporter plus per-route HTTP request metrics
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("climate-api", LogFormat::Json)?;
//! observability::init_metrics(9090)?;
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{init_metrics, RequestMetricsGuard, ServerMetrics};
