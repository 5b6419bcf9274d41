use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ApiConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());
    parse_config(&content)
}

/// Parse a YAML document after environment variable substitution.
pub fn parse_config(content: &str) -> Result<ApiConfig> {
    let substituted = substitution::substitute_env_vars(content)?;
    debug!("Environment variable substitution completed");

    let config: ApiConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!("Configuration loaded successfully");
    Ok(config)
}

#[instrument]
pub fn generate_default_config() -> ApiConfig {
    ApiConfig {
        service: ServiceConfig::default(),
        server: HttpConfig::default(),
        database: DatabaseConfig::default(),
        dataset: DatasetConfig::default(),
        metrics: MetricsConfig::default(),
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &ApiConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("climate-api.yaml");

        let config = generate_default_config();
        save_config(&config, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config("/nonexistent/climate-api.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_parse_config_substitutes_env() {
        std::env::set_var("CLIMATE_TEST_DB_PATH", "/srv/hawaii.sqlite");
        let config = parse_config("database:\n  url: sqlite://${CLIMATE_TEST_DB_PATH}\n").unwrap();
        assert_eq!(config.database.url, "sqlite:///srv/hawaii.sqlite");
    }

    #[test]
    fn test_parse_config_rejects_bad_yaml() {
        let result = parse_config("server: [unterminated");
        assert!(result.is_err());
    }
}
