//! Core business logic for Lanyard.
//!
//! # Modules
//!
//! - [`batch`] - the batch coordinator and the state it owns
//!
//! # Workflows
//!
//! 1. **Export**: render every selected registration onto page sheets while
//!    publishing progress
//! 2. **Distribute**: render one card per registration with an email address
//!    and hand it to the mail transport, collecting failures instead of
//!    stopping
//! 3. **Single token**: encode one registration and optionally save it
//!
//! # Example
//!
//! ```rust,no_run
//! use lanyard::adapters::mail::DryRunTransport;
//! use lanyard::adapters::store::load_registrations;
//! use lanyard::config::load_config;
//! use lanyard::core::batch::BatchCoordinator;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("lanyard.toml")?;
//! let registrations = load_registrations("registrations.json")?;
//!
//! let coordinator = BatchCoordinator::from_config(&config, Arc::new(DryRunTransport::new()));
//! let document = coordinator.export(&registrations).await?;
//!
//! println!("Pages: {}", document.page_count);
//! # Ok(())
//! # }
//! ```

pub mod batch;
