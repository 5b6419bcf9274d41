//! Configuration model for the climate API.
//!
//! The configuration is a single YAML document. Every section is optional and
//! falls back to the values in [`defaults`], so `{}` is a valid configuration
//! pointing at `hawaii.sqlite` in the working directory.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub server: HttpConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub port: u16,
    /// Upper bound on a whole HTTP request, including the store query.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_http_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl HttpConfig {
    /// `host:port` as a display string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite://hawaii.sqlite`.
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
    /// Upper bound on a single store query.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            acquire_timeout_seconds: default_acquire_timeout(),
            query_timeout_seconds: default_query_timeout(),
        }
    }
}

/// Fixed facts about the dataset being served.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatasetConfig {
    /// Last date present in the dataset; anchors the trailing window.
    #[serde(default = "default_reference_date")]
    pub reference_date: NaiveDate,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    /// Station with the most observations, served by `/api/v1.0/tobs`.
    #[serde(default = "default_primary_station")]
    pub primary_station: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            reference_date: default_reference_date(),
            window_days: default_window_days(),
            primary_station: default_primary_station(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        generate_default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
service:
  name: hawaii-climate
server:
  host: 127.0.0.1
  port: 8000
  request_timeout_seconds: 15
database:
  url: sqlite:///data/hawaii.sqlite
  max_connections: 8
  acquire_timeout_seconds: 3
  query_timeout_seconds: 4
dataset:
  reference_date: 2017-08-23
  window_days: 365
  primary_station: USC00519281
metrics:
  enabled: true
  port: 9100
"#;
        let cfg: ApiConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(cfg.service.name, "hawaii-climate");
        assert_eq!(cfg.server.address(), "127.0.0.1:8000");
        assert_eq!(cfg.server.request_timeout_seconds, 15);
        assert_eq!(cfg.database.url, "sqlite:///data/hawaii.sqlite");
        assert_eq!(cfg.database.max_connections, 8);
        assert_eq!(
            cfg.dataset.reference_date,
            NaiveDate::from_ymd_opt(2017, 8, 23).unwrap()
        );
        assert_eq!(cfg.dataset.primary_station, "USC00519281");
        assert!(cfg.metrics.enabled);
        assert_eq!(cfg.metrics.port, 9100);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
server:
  port: 8081
"#;
        let cfg: ApiConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.server.host, default_host());
        assert_eq!(cfg.database, DatabaseConfig::default());
        assert_eq!(cfg.dataset, DatasetConfig::default());
        assert!(!cfg.metrics.enabled);
    }

    #[test]
    fn test_invalid_reference_date_rejected() {
        let yaml = r#"
dataset:
  reference_date: 2017-02-30
"#;
        let result: Result<ApiConfig, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }
}
