use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "config/climate-api.yaml";

#[derive(Parser, Debug)]
#[command(name = "climate-api")]
#[command(about = "Read-only HTTP API over the Hawaii climate dataset")]
#[command(version)]
pub struct Cli {
    /// Log output format
    #[arg(
        long,
        global = true,
        value_enum,
        env = "CLIMATE_API_LOG_FORMAT",
        default_value = "pretty"
    )]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Serve the API (default when no command is given)
    Serve {
        /// Path to the configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Override the bind host
        #[arg(long, env = "CLIMATE_API_HOST")]
        host: Option<String>,

        /// Override the HTTP port
        #[arg(long, env = "CLIMATE_API_PORT")]
        port: Option<u16>,
    },

    /// Validate configuration without starting the server
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Write a configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "climate-api.yaml")]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    /// Human-readable multi-line output
    Pretty,
    /// One JSON object per line
    Json,
    /// Single-line output
    Compact,
}

impl LogFormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormatArg::Pretty => "pretty",
            LogFormatArg::Json => "json",
            LogFormatArg::Compact => "compact",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The command to run; `serve` with defaults when none was given.
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or_else(|| Commands::Serve {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            host: None,
            port: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_defaults_to_serve() {
        let cli = Cli::try_parse_from(["climate-api"]).unwrap();
        assert_eq!(
            cli.command_or_default(),
            Commands::Serve {
                config: PathBuf::from(DEFAULT_CONFIG_PATH),
                host: None,
                port: None,
            }
        );
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from([
            "climate-api",
            "--log-format",
            "json",
            "serve",
            "--config",
            "/etc/climate.yaml",
            "--host",
            "127.0.0.1",
            "--port",
            "8000",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormatArg::Json);
        assert_eq!(
            cli.command_or_default(),
            Commands::Serve {
                config: PathBuf::from("/etc/climate.yaml"),
                host: Some("127.0.0.1".to_string()),
                port: Some(8000),
            }
        );
    }

    #[test]
    fn test_global_log_format_after_subcommand() {
        let cli = Cli::try_parse_from(["climate-api", "validate", "--log-format", "compact"]).unwrap();
        assert_eq!(cli.log_format, LogFormatArg::Compact);
        assert!(matches!(cli.command, Some(Commands::Validate { .. })));
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(Cli::try_parse_from(["climate-api", "serve", "--port", "70000"]).is_err());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
