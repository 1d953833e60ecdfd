//! External system integrations for Lanyard.
//!
//! - [`render`] - token encoder, card renderer and document assembler
//! - [`mail`] - outbound mail transport
//! - [`store`] - registration records read from JSON exports
//!
//! # Design Pattern
//!
//! Each collaborator of the batch coordinator sits behind a trait
//! ([`render::TokenEncoder`], [`render::CardRenderer`],
//! [`render::DocumentAssembler`], [`mail::MailTransport`]) so tests can use
//! deterministic doubles and deployments can swap backends.
//!
//! ```rust,no_run
//! use lanyard::adapters::mail::HttpMailTransport;
//! use lanyard::adapters::render::SheetAssembler;
//! use lanyard::config::LanyardConfig;
//!
//! # fn example() -> lanyard::domain::Result<()> {
//! let config = LanyardConfig::default();
//! let assembler = SheetAssembler::from_config(&config.layout, &config.output);
//! let transport = HttpMailTransport::new(&config.mail)?;
//! # Ok(())
//! # }
//! ```

pub mod mail;
pub mod render;
pub mod store;
