//! Token command implementation
//!
//! Generates the QR token of a single registration and either saves it as
//! `<prefix>_<code>.<ext>` or prints it as a data URI.

use crate::adapters::mail::DryRunTransport;
use crate::adapters::store::load_registrations;
use crate::config::load_config_or_default;
use crate::core::batch::BatchCoordinator;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the token command
#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Registration export (JSON array or `{"registrations": [...]}`)
    #[arg(
        short,
        long,
        default_value = "registrations.json",
        env = "LANYARD_REGISTRATIONS"
    )]
    pub input: String,

    /// Registration ID
    #[arg(long)]
    pub id: String,

    /// Directory to save the token in (default: output.directory)
    #[arg(short, long)]
    pub out: Option<String>,

    /// Print the token as a data URI instead of saving it
    #[arg(long, conflicts_with = "out")]
    pub print: bool,
}

impl TokenArgs {
    /// Execute the token command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let registrations = match load_registrations(&self.input) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Failed to load registrations: {e}");
                return Ok(2);
            }
        };

        let Some(registration) = registrations.iter().find(|r| r.id.as_str() == self.id) else {
            eprintln!("Registration not found: {}", self.id);
            return Ok(1);
        };

        let coordinator = BatchCoordinator::from_config(&config, Arc::new(DryRunTransport::new()));

        if self.print {
            return match coordinator.retrieve_token(registration).await {
                Ok(token) => {
                    println!("{}", token.to_data_uri());
                    Ok(0)
                }
                Err(e) => {
                    eprintln!("{e}");
                    Ok(5)
                }
            };
        }

        let directory = PathBuf::from(self.out.as_deref().unwrap_or(&config.output.directory));
        match coordinator.save_token(registration, &directory).await {
            Ok(path) => {
                println!("✅ Token saved: {}", path.display());
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, registration_id = %registration.id, "Failed to save token");
                eprintln!("Failed to save token: {e}");
                Ok(5)
            }
        }
    }
}
