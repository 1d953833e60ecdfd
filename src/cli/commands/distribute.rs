//! Distribute command implementation
//!
//! This module implements the `distribute` command, which mails each selected
//! registration its card.

use super::SelectionArgs;
use crate::adapters::mail::{DryRunTransport, HttpMailTransport, MailTransport};
use crate::config::load_config_or_default;
use crate::core::batch::BatchCoordinator;
use crate::domain::LanyardError;
use clap::Args;
use std::sync::Arc;

/// Failures listed before the output is cut short
const MAX_LISTED_ERRORS: usize = 10;

/// Arguments for the distribute command
#[derive(Args, Debug)]
pub struct DistributeArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - render cards and log messages without sending them
    #[arg(long)]
    pub dry_run: bool,
}

impl DistributeArgs {
    /// Execute the distribute command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(dry_run = self.dry_run, "Starting distribute command");

        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let transport: Arc<dyn MailTransport> = if self.dry_run {
            println!("🔍 DRY RUN MODE - No email will be sent");
            println!();
            Arc::new(DryRunTransport::new())
        } else {
            match HttpMailTransport::new(&config.mail) {
                Ok(t) => Arc::new(t),
                Err(e) => {
                    tracing::error!(error = %e, "Mail transport unavailable");
                    eprintln!("{e}");
                    return Ok(2);
                }
            }
        };

        let registrations = match self.selection.load() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Failed to load registrations: {e}");
                return Ok(2);
            }
        };

        if !self.yes && !self.dry_run {
            let recipients = registrations
                .iter()
                .filter(|r| r.deliverable_email().is_some())
                .count();
            println!("Distribution:");
            println!("  Registrations selected: {}", registrations.len());
            println!("  With email address: {recipients}");
            println!("  Subject: {}", config.mail.subject);
            println!("  Endpoint: {}", config.mail.endpoint);
            println!();
            print!("Send cards now? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Distribution cancelled.");
                return Ok(0);
            }
        }

        let coordinator = BatchCoordinator::from_config(&config, transport);

        println!("🚀 Sending cards...");
        let result = match coordinator.distribute(&registrations).await {
            Ok(r) => r,
            Err(e @ (LanyardError::EmptySelection | LanyardError::NoDeliverableRecipients)) => {
                println!("❌ {e}");
                return Ok(1);
            }
            Err(e) => {
                tracing::error!(error = %e, "Distribution failed");
                eprintln!("Distribution failed: {e}");
                return Ok(5);
            }
        };

        println!();
        println!("📊 Distribution Summary:");
        println!("  Sent: {}", result.success);
        println!("  Failed: {}", result.failed);
        println!("  Skipped (no email): {}", result.skipped);
        println!("  Duration: {:.2}s", result.duration.as_secs_f64());
        println!("  Success Rate: {:.2}%", result.success_rate());
        println!();

        if !result.errors.is_empty() {
            println!("⚠️  Errors encountered:");
            for error in result.errors.iter().take(MAX_LISTED_ERRORS) {
                println!("  - {error}");
            }
            if result.errors.len() > MAX_LISTED_ERRORS {
                println!(
                    "  ... and {} more failures",
                    result.errors.len() - MAX_LISTED_ERRORS
                );
            }
            println!();
        }

        let exit_code = if result.is_successful() {
            println!("✅ Distribution completed successfully!");
            0
        } else {
            println!("⚠️  Distribution completed with failures");
            1
        };

        Ok(exit_code)
    }
}
