//! Command-line interface parsing for WSA Weather
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated [`StartupConfig`].

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

/// Smallest accepted request timeout in seconds
pub const MIN_TIMEOUT_SECS: u64 = 1;
/// Largest accepted request timeout in seconds
pub const MAX_TIMEOUT_SECS: u64 = 120;
/// Request timeout used when `--timeout` is not given
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The requested timeout is outside the accepted range
    #[error("Invalid timeout: {0}s. Timeout must be between 1 and 120 seconds")]
    InvalidTimeout(u64),
}

/// WSA Weather - current conditions and daily outlook in your terminal
#[derive(Parser, Debug)]
#[command(name = "wsaweather")]
#[command(about = "Current weather conditions and daily outlook from Open-Meteo")]
#[command(version)]
pub struct Cli {
    /// Seconds to wait for the forecast request before giving up
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Print the current conditions to stdout and exit instead of opening the TUI
    #[arg(long)]
    pub print: bool,

    /// Print the reshaped forecast as JSON (implies --print)
    #[arg(long)]
    pub json: bool,

    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

/// How the application presents the forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Full-screen terminal UI
    #[default]
    Interactive,
    /// One-shot plain text summary on stdout
    Text,
    /// One-shot JSON dump of the reshaped forecast on stdout
    Json,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Timeout applied to the forecast request
    pub timeout: Duration,
    /// Presentation mode
    pub output: OutputMode,
    /// Default log filter directive
    pub log_level: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            output: OutputMode::Interactive,
            log_level: "info".to_string(),
        }
    }
}

/// Validates a timeout given in seconds.
///
/// # Returns
/// * `Ok(Duration)` if the value is within 1..=120 seconds
/// * `Err(CliError::InvalidTimeout)` otherwise
pub fn parse_timeout_arg(secs: u64) -> Result<Duration, CliError> {
    if (MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&secs) {
        Ok(Duration::from_secs(secs))
    } else {
        Err(CliError::InvalidTimeout(secs))
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the timeout is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let timeout = parse_timeout_arg(cli.timeout)?;
        let output = match (cli.json, cli.print) {
            (true, _) => OutputMode::Json,
            (false, true) => OutputMode::Text,
            (false, false) => OutputMode::Interactive,
        };

        Ok(StartupConfig {
            timeout,
            output,
            log_level: cli.log_level.clone(),
        })
    }

    pub fn is_interactive(&self) -> bool {
        self.output == OutputMode::Interactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout_arg_accepts_range_bounds() {
        assert_eq!(parse_timeout_arg(1).unwrap(), Duration::from_secs(1));
        assert_eq!(parse_timeout_arg(120).unwrap(), Duration::from_secs(120));
    }

    #[test]
    fn test_parse_timeout_arg_rejects_out_of_range() {
        let err = parse_timeout_arg(0).unwrap_err();
        assert!(err.to_string().contains("Invalid timeout"));
        assert!(parse_timeout_arg(121).is_err());
    }

    #[test]
    fn test_startup_config_default() {
        let config = StartupConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.output, OutputMode::Interactive);
        assert_eq!(config.log_level, "info");
        assert!(config.is_interactive());
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["wsaweather"]);
        assert_eq!(cli.timeout, 15);
        assert!(!cli.print);
        assert!(!cli.json);
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_startup_config_from_cli_print() {
        let cli = Cli::parse_from(["wsaweather", "--print", "--timeout", "30"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.output, OutputMode::Text);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(!config.is_interactive());
    }

    #[test]
    fn test_startup_config_from_cli_json_implies_print() {
        let cli = Cli::parse_from(["wsaweather", "--json"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.output, OutputMode::Json);

        let cli = Cli::parse_from(["wsaweather", "--json", "--print"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.output, OutputMode::Json);
    }

    #[test]
    fn test_startup_config_from_cli_invalid_timeout() {
        let cli = Cli::parse_from(["wsaweather", "--timeout", "0"]);
        assert!(StartupConfig::from_cli(&cli).is_err());
    }

    #[test]
    fn test_startup_config_keeps_log_level() {
        let cli = Cli::parse_from(["wsaweather", "--log-level", "debug"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.log_level, "debug");
    }
}
