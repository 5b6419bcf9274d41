use crate::*;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Service name is required")]
    MissingServiceName,

    #[error("Server: {message}")]
    InvalidServer { message: String },

    #[error("Database: {message}")]
    InvalidDatabase { message: String },

    #[error("Dataset: {message}")]
    InvalidDataset { message: String },

    #[error("Metrics: {message}")]
    InvalidMetrics { message: String },

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &ApiConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    if config.service.name.trim().is_empty() {
        report.add_error(ValidationError::MissingServiceName);
    }

    validate_server(&config.server, &mut report);
    validate_database(&config.database, &mut report);
    validate_dataset(&config.dataset, &mut report);
    validate_metrics(&config.metrics, config.server.port, &mut report);

    if config.database.query_timeout_seconds > config.server.request_timeout_seconds {
        report.add_warning(
            "database.query_timeout_seconds",
            "Query timeout exceeds the request timeout; slow queries will surface as request timeouts",
        );
    }

    report
}

fn validate_server(server: &HttpConfig, report: &mut ValidationReport) {
    if server.host.trim().is_empty() {
        report.add_error(ValidationError::InvalidServer {
            message: "host is required".to_string(),
        });
    } else if has_unresolved_env_vars(&server.host) {
        report.add_warning("server.host", "Contains an unresolved environment variable");
    }

    if server.port == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "server.port".to_string(),
        });
    } else if server.port < 1024 {
        report.add_warning(
            "server.port",
            "Ports below 1024 usually require elevated privileges",
        );
    }

    if server.request_timeout_seconds == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "server.request_timeout_seconds".to_string(),
        });
    }
}

fn validate_database(database: &DatabaseConfig, report: &mut ValidationReport) {
    if has_unresolved_env_vars(&database.url) {
        report.add_warning("database.url", "Contains an unresolved environment variable");
    }

    match Url::parse(&database.url) {
        Ok(url) if url.scheme() == "sqlite" => {}
        Ok(url) => report.add_error(ValidationError::InvalidDatabase {
            message: format!("Unsupported scheme '{}'. Must be sqlite", url.scheme()),
        }),
        Err(e) => report.add_error(ValidationError::InvalidDatabase {
            message: format!("Invalid url '{}': {}", database.url, e),
        }),
    }

    if database.max_connections == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "database.max_connections".to_string(),
        });
    }

    if database.acquire_timeout_seconds == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "database.acquire_timeout_seconds".to_string(),
        });
    }

    if database.query_timeout_seconds == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "database.query_timeout_seconds".to_string(),
        });
    }
}

fn validate_dataset(dataset: &DatasetConfig, report: &mut ValidationReport) {
    if dataset.window_days == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "dataset.window_days".to_string(),
        });
    }

    let window = chrono::Days::new(u64::from(dataset.window_days));
    if dataset.reference_date.checked_sub_days(window).is_none() {
        report.add_error(ValidationError::InvalidDataset {
            message: format!(
                "window of {} days before {} is out of range",
                dataset.window_days, dataset.reference_date
            ),
        });
    }

    if dataset.primary_station.trim().is_empty() {
        report.add_error(ValidationError::InvalidDataset {
            message: "primary_station is required".to_string(),
        });
    }
}

fn validate_metrics(metrics: &MetricsConfig, http_port: u16, report: &mut ValidationReport) {
    if !metrics.enabled {
        return;
    }

    if metrics.port == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "metrics.port".to_string(),
        });
    }

    if metrics.port == http_port {
        report.add_error(ValidationError::InvalidMetrics {
            message: format!("port {} collides with the HTTP server port", metrics.port),
        });
    }
}
