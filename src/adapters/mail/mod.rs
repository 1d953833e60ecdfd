//! Outbound mail transport
//!
//! The coordinator hands one [`MailMessage`] per recipient to a
//! [`MailTransport`]. [`HttpMailTransport`] posts it to the mail service;
//! [`DryRunTransport`] only logs it.

pub mod client;
pub mod models;

pub use client::HttpMailTransport;
pub use models::{render_subject, MailMessage, SendResponse};

use crate::domain::TransportError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Delivers a single message
///
/// Implementations report failures as [`TransportError`]s with a readable
/// message. Retrying is left to the caller.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), TransportError>;
}

/// Transport that logs messages instead of sending them
#[derive(Debug, Default)]
pub struct DryRunTransport {
    sent: AtomicUsize,
}

impl DryRunTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages accepted so far
    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailTransport for DryRunTransport {
    async fn send(&self, message: &MailMessage) -> Result<(), TransportError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            camper_code = %message.camper_code,
            payload_len = message.payload.len(),
            "Dry run: message not sent"
        );
        Ok(())
    }
}
