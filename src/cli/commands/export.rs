//! Export command implementation
//!
//! This module implements the `export` command, which renders the selected
//! registrations onto printable page sheets.

use super::SelectionArgs;
use crate::adapters::mail::DryRunTransport;
use crate::config::load_config_or_default;
use crate::core::batch::BatchCoordinator;
use crate::domain::LanyardError;
use clap::Args;
use std::sync::Arc;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Override the output directory
    #[arg(short, long)]
    pub out: Option<String>,

    /// Override the document name
    #[arg(long)]
    pub name: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if let Some(out) = &self.out {
            tracing::info!(directory = %out, "Overriding output directory from CLI");
            config.output.directory = out.clone();
        }
        if let Some(name) = &self.name {
            config.output.document_name = name.clone();
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let registrations = match self.selection.load() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Failed to load registrations: {e}");
                return Ok(2);
            }
        };

        // Export never sends mail
        let coordinator = BatchCoordinator::from_config(&config, Arc::new(DryRunTransport::new()));

        let mut progress = coordinator.subscribe();
        let printer = tokio::spawn(async move {
            while progress.changed().await.is_ok() {
                let state = progress.borrow_and_update().clone();
                if state.active {
                    println!("⏳ {}", state.message);
                }
            }
        });

        let outcome = coordinator.export(&registrations).await;
        drop(coordinator);
        let _ = printer.await;

        match outcome {
            Ok(document) => {
                println!();
                println!("📄 Export Summary:");
                println!("  Registrations: {}", document.registration_count);
                println!("  Pages: {}", document.page_count);
                println!("  Location: {}", document.location.display());
                println!();
                println!("✅ Export completed successfully!");
                Ok(0)
            }
            Err(LanyardError::EmptySelection) => {
                println!("❌ No registrations selected, nothing to export");
                Ok(1)
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                Ok(5)
            }
        }
    }
}
