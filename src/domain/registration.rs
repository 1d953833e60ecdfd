//! Registration domain model
//!
//! A registration is one participant who should receive a scannable card.
//! The pipeline only ever reads registrations; the Registration Store owns
//! their lifecycle.

use super::ids::RegistrationId;
use serde::{Deserialize, Serialize};

/// A participant record as supplied by the Registration Store
///
/// Keys are accepted in snake_case or camelCase so exports from the web
/// backend load without a mapping step.
///
/// # Examples
///
/// ```
/// use lanyard::domain::registration::RegistrationBuilder;
///
/// let registration = RegistrationBuilder::new()
///     .id("reg-1")
///     .unwrap()
///     .camper_code("CAMP-001")
///     .email("ada@example.com")
///     .first_name("Ada")
///     .last_name("Lovelace")
///     .build()
///     .unwrap();
///
/// assert_eq!(registration.display_name(), "Ada Lovelace");
/// assert_eq!(registration.code(), "CAMP-001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Unique registration identifier
    pub id: RegistrationId,

    /// Human-readable code printed on the card
    #[serde(default, alias = "camperCode")]
    pub camper_code: Option<String>,

    /// Recipient address for distribution
    #[serde(default)]
    pub email: Option<String>,

    /// Given name
    #[serde(default, alias = "firstName")]
    pub first_name: String,

    /// Family name
    #[serde(default, alias = "lastName")]
    pub last_name: String,

    /// Event the registration belongs to
    #[serde(default, alias = "eventName")]
    pub event_name: Option<String>,

    /// Cabin, team or group assignment
    #[serde(default)]
    pub group: Option<String>,
}

impl Registration {
    /// Creates a new builder for constructing a Registration
    pub fn builder() -> RegistrationBuilder {
        RegistrationBuilder::default()
    }

    /// The identifier shown to people: the camper code, or the id when the
    /// code is missing or blank
    pub fn code(&self) -> &str {
        match self.camper_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code,
            _ => self.id.as_str(),
        }
    }

    /// First and last name joined by a space, falling back to [`code`](Self::code)
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.code().to_string()
        } else {
            name.to_string()
        }
    }

    /// The email address to deliver to, if the record has a usable one
    pub fn deliverable_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

/// Builder for constructing Registration instances
#[derive(Debug, Default)]
pub struct RegistrationBuilder {
    id: Option<RegistrationId>,
    camper_code: Option<String>,
    email: Option<String>,
    first_name: String,
    last_name: String,
    event_name: Option<String>,
    group: Option<String>,
}

impl RegistrationBuilder {
    /// Creates a new empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the registration id
    pub fn id(mut self, id: impl Into<String>) -> Result<Self, String> {
        self.id = Some(RegistrationId::new(id)?);
        Ok(self)
    }

    pub fn camper_code(mut self, code: impl Into<String>) -> Self {
        self.camper_code = Some(code.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = name.into();
        self
    }

    pub fn last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = name.into();
        self
    }

    pub fn event_name(mut self, name: impl Into<String>) -> Self {
        self.event_name = Some(name.into());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Builds the Registration
    ///
    /// # Errors
    ///
    /// Returns an error if the id was never set
    pub fn build(self) -> Result<Registration, String> {
        let id = self.id.ok_or_else(|| "id is required".to_string())?;
        Ok(Registration {
            id,
            camper_code: self.camper_code,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            event_name: self.event_name,
            group: self.group,
        })
    }
}
