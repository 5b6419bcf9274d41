//! HTTP server infrastructure for the climate API
//!
//! All servers implement the [`Server`] trait; [`ServerExt`] adds `spawn()`
//! and `run_with_ctrl_c()`. Shutdown is coordinated with a
//! `tokio_util` `CancellationToken`, so cancelling a parent token stops every
//! server holding a child of it.
//!
//! ```ignore
//! use server::{HttpServer, ServerConfig, ServerExt};
//!
//! let config = ServerConfig::new("0.0.0.0", 5000);
//! HttpServer::new(config, router).run_with_ctrl_c().await?;
//! ```
//!
//! # Modules
//!
//! - [`config`] - bind address and request timeout
//! - [`traits`] - `Server` and `ServerExt` traits
//! - [`http`] - Axum server with trace, metrics and timeout layers
//! - [`health`] - liveness and dependency health endpoints
//! - [`shutdown`] - graceful shutdown on Ctrl+C / SIGTERM
//! - [`port_validator`] - early feedback on bind failures

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod port_validator;
pub mod shutdown;
pub mod traits;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use health::{health_routes, ComponentStatus, HealthCheck, HealthState};
pub use http::HttpServer;
pub use port_validator::validate_port_available;
pub use shutdown::ShutdownController;
pub use traits::{Server, ServerExt};
