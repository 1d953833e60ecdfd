//! Mail service wire models

use crate::domain::Registration;
use serde::{Deserialize, Serialize};

/// Message body posted to the mail service
///
/// ```json
/// {
///   "to": "ada@example.com",
///   "subject": "Your camp registration QR code",
///   "name": "Ada Lovelace",
///   "camperCode": "CAMP-001",
///   "payload": "iVBORw0KGgo..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub name: String,
    #[serde(rename = "camperCode")]
    pub camper_code: String,
    /// Raw base64 card image, without a data-URI prefix
    pub payload: String,
}

impl MailMessage {
    /// Builds the message for `registration` addressed to `to`
    pub fn for_registration(
        registration: &Registration,
        to: &str,
        subject_template: &str,
        payload: String,
    ) -> Self {
        Self {
            to: to.to_string(),
            subject: render_subject(subject_template, registration),
            name: registration.display_name(),
            camper_code: registration.code().to_string(),
            payload,
        }
    }
}

/// Fills `{name}` and `{code}` in a subject template
pub fn render_subject(template: &str, registration: &Registration) -> String {
    template
        .replace("{name}", &registration.display_name())
        .replace("{code}", registration.code())
}

/// Body returned by the mail service
///
/// Services that answer with an empty body or plain text are treated as
/// successful when the status is 2xx.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SendResponse {
    /// The failure reported in the body, if any
    pub fn failure(&self) -> Option<String> {
        if self.success == Some(false) {
            Some(
                self.error
                    .clone()
                    .or_else(|| self.message.clone())
                    .unwrap_or_else(|| "Mail service reported failure".to_string()),
            )
        } else {
            None
        }
    }
}
