//! Server configuration

use std::time::Duration;

/// Bind address and per-request limits for an [`HttpServer`](crate::HttpServer).
///
/// ```
/// use server::config::ServerConfig;
/// use std::time::Duration;
///
/// let config = ServerConfig::new("127.0.0.1", 5000)
///     .with_request_timeout(Duration::from_secs(30));
/// assert_eq!(config.address(), "127.0.0.1:5000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port to bind to; 0 picks an ephemeral port
    pub port: u16,
    /// Requests running longer than this are answered with 408
    pub request_timeout: Option<Duration>,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            request_timeout: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// `host:port` as a display string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<&config::HttpConfig> for ServerConfig {
    fn from(http: &config::HttpConfig) -> Self {
        Self::new(http.host.clone(), http.port)
            .with_request_timeout(Duration::from_secs(http.request_timeout_seconds))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", 5000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_new() {
        let config = ServerConfig::new("127.0.0.1", 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_from_http_config() {
        let http = config::HttpConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            request_timeout_seconds: 15,
        };

        let config = ServerConfig::from(&http);
        assert_eq!(config.address(), "127.0.0.1:8000");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }
}
