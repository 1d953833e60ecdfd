//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Lanyard configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after applying overrides
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        if config.mail.is_configured() {
            println!("  Mail Endpoint: {}", config.mail.endpoint);
            println!(
                "  Mail API Key: {}",
                if config.mail.api_key.is_some() {
                    "set"
                } else {
                    "not set"
                }
            );
        } else {
            println!("  Mail Endpoint: not configured (distribution disabled)");
        }
        println!("  Subject: {}", config.mail.subject);
        println!("  Concurrent Sends: {}", config.mail.max_concurrent_sends);
        println!("  Output Directory: {}", config.output.directory);
        println!(
            "  Token Files: {}_<code>.{}",
            config.output.token_prefix, config.output.token_extension
        );
        println!(
            "  Page Layout: {} x {} cards of {}x{}px",
            config.layout.cards_per_row,
            config.layout.rows_per_page,
            config.layout.card_width_px,
            config.layout.card_height_px
        );
        println!();
        Ok(0)
    }
}
