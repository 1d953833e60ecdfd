//! HTTP mail transport
//!
//! Posts each [`MailMessage`] as JSON to the configured endpoint (typically a
//! serverless function in front of the mail provider).

use super::{MailMessage, MailTransport, SendResponse};
use crate::config::MailConfig;
use crate::domain::{LanyardError, Result, TransportError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Sends messages through an HTTP mail service
///
/// # Example
///
/// ```no_run
/// use lanyard::adapters::mail::HttpMailTransport;
/// use lanyard::config::MailConfig;
///
/// let config = MailConfig {
///     endpoint: "https://project.functions.example.com/send-qr-email".to_string(),
///     ..MailConfig::default()
/// };
/// let transport = HttpMailTransport::new(&config).expect("valid mail configuration");
/// ```
pub struct HttpMailTransport {
    endpoint: String,
    client: Client,
    auth_header: Option<String>,
}

impl HttpMailTransport {
    /// Builds the transport from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no endpoint is set or the HTTP
    /// client cannot be built.
    pub fn new(config: &MailConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(LanyardError::Configuration(
                "mail.endpoint must be set to distribute cards".to_string(),
            ));
        }

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)));

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification is disabled for the mail endpoint");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            LanyardError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        let auth_header = config
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().is_blank())
            .map(|key| format!("Bearer {}", key.expose_secret().as_str()));

        Ok(Self {
            endpoint: config.endpoint.trim().to_string(),
            client,
            auth_header,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MailTransport for HttpMailTransport {
    async fn send(&self, message: &MailMessage) -> std::result::Result<(), TransportError> {
        let mut request = self.client.post(&self.endpoint).json(message);
        if let Some(auth) = &self.auth_header {
            request = request.header("Authorization", auth);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else {
                TransportError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<SendResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.error.or(parsed.message))
                .unwrap_or(body)
                .trim()
                .to_string();
            let message = if message.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                message
            };
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        if let Ok(parsed) = serde_json::from_str::<SendResponse>(&body) {
            if let Some(failure) = parsed.failure() {
                return Err(TransportError::Failed(failure));
            }
        }

        tracing::debug!(to = %message.to, status = status.as_u16(), "Message accepted");
        Ok(())
    }
}
