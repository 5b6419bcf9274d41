//! Climate API CLI and server binary
//!
//! `climate-api serve` (the default) loads the configuration, opens the
//! SQLite dataset read-only and serves the HTTP API until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use climate::{climate_routes, ClimateApiState, ClimateService, SqliteClimateStore};
use cli::{Cli, Commands};
use config::{
    generate_default_config, load_config, save_config, validate_config, ApiConfig,
    ValidationReport,
};
use observability::{init_logging, LogFormat};
use server::{HttpServer, ServerConfig, ServerExt};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let format = LogFormat::parse(cli.log_format.as_str()).unwrap_or_default();
    init_logging("climate-api", format)?;
    debug!(?cli, "CLI arguments parsed");

    match cli.command_or_default() {
        Commands::Serve { config, host, port } => {
            info!("Executing 'serve' command");
            serve_command(&config, host, port).await
        }
        Commands::Validate { config } => {
            info!("Executing 'validate' command");
            validate_command(&config)
        }
        Commands::Init { output } => {
            info!("Executing 'init' command");
            init_command(&output)
        }
    }
}

/// Load the config file, or fall back to the built-in defaults if it does not
/// exist. A file that exists but fails to parse is an error.
fn load_or_default(path: &Path, report: &mut ValidationReport) -> Result<ApiConfig> {
    if path.exists() {
        return load_config(path);
    }

    warn!(?path, "Configuration file not found, using built-in defaults");
    let config = generate_default_config();
    report.add_default("config", &format!("built-in defaults ({} missing)", path.display()));
    report.add_default("database.url", &config.database.url);
    report.add_default("server.port", &config.server.port.to_string());
    Ok(config)
}

fn apply_overrides(config: &mut ApiConfig, host: Option<String>, port: Option<u16>) {
    if let Some(host) = host {
        debug!(%host, "Overriding server host");
        config.server.host = host;
    }
    if let Some(port) = port {
        debug!(port, "Overriding server port");
        config.server.port = port;
    }
}

fn log_report(report: &ValidationReport) -> Result<()> {
    for default in &report.defaults_applied {
        info!(field = %default.field, value = %default.value, "Default applied");
    }

    if !report.warnings.is_empty() {
        warn!("Configuration warnings:");
        for warning in &report.warnings {
            warn!(field = %warning.field, message = %warning.message);
        }
    }

    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot start climate API due to configuration errors");
    }

    Ok(())
}

async fn serve_command(config_path: &Path, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut report = ValidationReport::new();
    let mut config = load_or_default(config_path, &mut report)?;
    apply_overrides(&mut config, host, port);

    let validation = validate_config(&config);
    report.errors.extend(validation.errors);
    report.warnings.extend(validation.warnings);
    log_report(&report)?;

    if config.metrics.enabled {
        observability::init_metrics(config.metrics.port)
            .context("Failed to start metrics exporter")?;
    }

    let store = SqliteClimateStore::connect(&config.database)
        .await
        .with_context(|| format!("Failed to open climate database {}", config.database.url))?;

    let service = ClimateService::from_config(Arc::new(store.clone()), &config);
    info!(
        reference_date = %service.window().reference_date,
        window_days = service.window().window_days,
        primary_station = %service.window().primary_station,
        "Climate service ready"
    );

    let state = Arc::new(ClimateApiState::new(config.service.name.clone(), service));
    let server_config = ServerConfig::from(&config.server);

    server::port_validator::validate_port_range(server_config.port)?;
    server::validate_port_available(&server_config).await?;

    info!(address = %server_config.address(), "Starting climate API");
    let result = HttpServer::new(server_config, climate_routes(state))
        .run_with_ctrl_c()
        .await;

    store.close().await;
    info!("Database connections closed");

    result?;
    Ok(())
}

fn validate_command(config_path: &Path) -> Result<()> {
    info!(path = ?config_path, "Validating configuration");

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            return Err(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Service: {}", config.service.name);
    println!("Listen: {}", config.server.address());
    println!("Database: {}", config.database.url);
    println!(
        "Window: {} days ending {} (primary station {})",
        config.dataset.window_days, config.dataset.reference_date, config.dataset.primary_station
    );

    Ok(())
}

fn init_command(output_path: &Path) -> Result<()> {
    info!(?output_path, "Initializing new configuration file");

    if output_path.exists() {
        anyhow::bail!("Refusing to overwrite existing file: {:?}", output_path);
    }

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&generate_default_config(), output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Point database.url at your hawaii.sqlite file");
    println!(
        "  2. Run 'climate-api validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  3. Run 'climate-api serve --config {:?}' to start the API",
        output_path
    );

    Ok(())
}
