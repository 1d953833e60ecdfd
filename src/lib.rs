// Lanyard - Registration card export and distribution
// Copyright (c) 2026 Lanyard Contributors
// Licensed under the MIT License

//! # Lanyard - registration card pipeline
//!
//! Lanyard turns registration records into scannable cards and gets them to
//! people: printed on page sheets, or mailed one card per recipient.
//!
//! ## Overview
//!
//! This library provides:
//! - **Encoding** each registration as a QR token over a signed payload
//! - **Rendering** badge cards combining the token with name, code and group
//! - **Assembling** cards onto paginated sheets with a page estimate up front
//! - **Distributing** cards through a mail transport, isolating per-recipient
//!   failures
//! - **Reporting** export progress to subscribers
//!
//! ## Architecture
//!
//! Lanyard follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Batch coordinator, distribution results, progress state
//! - [`adapters`] - Token encoder, card renderer, document assembler, mail
//!   transport, registration loading
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lanyard::adapters::mail::HttpMailTransport;
//! use lanyard::adapters::store::load_registrations;
//! use lanyard::config::load_config;
//! use lanyard::core::batch::BatchCoordinator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("lanyard.toml")?;
//!     let registrations = load_registrations("registrations.json")?;
//!
//!     let transport = Arc::new(HttpMailTransport::new(&config.mail)?);
//!     let coordinator = BatchCoordinator::from_config(&config, transport);
//!
//!     let result = coordinator.distribute(&registrations).await?;
//!     println!("Sent {} cards, {} failed", result.success, result.failed);
//!     for error in &result.errors {
//!         println!("  {error}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Progress
//!
//! Exports publish [`core::batch::ProgressState`] through a watch channel:
//!
//! ```rust,no_run
//! # async fn example(coordinator: lanyard::core::batch::BatchCoordinator) {
//! let mut progress = coordinator.subscribe();
//! tokio::spawn(async move {
//!     while progress.changed().await.is_ok() {
//!         let state = progress.borrow_and_update().clone();
//!         println!("{} {}", state.active, state.message);
//!     }
//! });
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Lanyard uses the [`domain::LanyardError`] type for all errors. Batch
//! preconditions fail before any work starts; per-recipient failures are
//! collected in [`core::batch::DistributionResult::errors`] instead of being
//! returned.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
