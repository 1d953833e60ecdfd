//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Lanyard using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Lanyard - registration card export and distribution
#[derive(Parser, Debug)]
#[command(name = "lanyard")]
#[command(version, about, long_about = None)]
#[command(author = "Lanyard Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "lanyard.toml", env = "LANYARD_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LANYARD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render selected registrations onto printable page sheets
    Export(commands::export::ExportArgs),

    /// Email each selected registration its card
    Distribute(commands::distribute::DistributeArgs),

    /// Generate or save the QR token of one registration
    Token(commands::token::TokenArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["lanyard", "export"]);
        assert_eq!(cli.config, "lanyard.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["lanyard", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["lanyard", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_distribute_flags() {
        let cli = Cli::parse_from(["lanyard", "distribute", "--dry-run", "--yes"]);
        match cli.command {
            Commands::Distribute(args) => {
                assert!(args.dry_run);
                assert!(args.yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_token() {
        let cli = Cli::parse_from(["lanyard", "token", "--id", "reg-1", "--out", "tokens"]);
        match cli.command {
            Commands::Token(args) => {
                assert_eq!(args.id, "reg-1");
                assert_eq!(args.out.as_deref(), Some("tokens"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["lanyard", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["lanyard", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
