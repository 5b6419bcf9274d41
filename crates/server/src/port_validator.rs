//! Port validation
//!
//! Checking a port before binding is inherently racy: another process can take
//! it in between. This only gives early feedback; the real bind decides.

use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// Check that the configured port can currently be bound.
pub async fn validate_port_available(config: &ServerConfig) -> Result<()> {
    if config.port == 0 {
        debug!("Ephemeral port requested, skipping availability check");
        return Ok(());
    }

    debug!("Checking HTTP port {}", config.port);

    match TcpListener::bind((config.host.as_str(), config.port)).await {
        Ok(listener) => {
            let local_addr = listener
                .local_addr()
                .map_err(|e| ServerError::bind(config.address(), e))?;
            drop(listener);

            info!("HTTP port {} is available ({})", config.port, local_addr);
            Ok(())
        }
        Err(e) => {
            error!("HTTP port {} is NOT available: {}", config.port, e);
            Err(ServerError::port_in_use(config.port, e.to_string()))
        }
    }
}

/// Returns `true` if the port appears to be in use.
pub async fn is_port_in_use(host: &str, port: u16) -> bool {
    TcpListener::bind((host, port)).await.is_err()
}

/// Reject port 0 for explicit binding and warn on privileged ports.
pub fn validate_port_range(port: u16) -> Result<()> {
    if port == 0 {
        Err(ServerError::ConfigError(
            "Port cannot be 0 (ephemeral port assignment not supported for explicit binding)"
                .to_string(),
        ))
    } else {
        if port < 1024 {
            warn!("Port {} is a privileged port (requires root/admin privileges)", port);
        }
        Ok(())
    }
}
