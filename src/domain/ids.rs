//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers a registration carries. Each type
//! rejects blank input so downstream code can rely on a usable value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Registration identifier newtype wrapper
///
/// The unique key the Registration Store assigns to a record. Usually a UUID,
/// but any non-blank string is accepted.
///
/// # Examples
///
/// ```
/// use lanyard::domain::ids::RegistrationId;
/// use std::str::FromStr;
///
/// let id = RegistrationId::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap();
/// assert_eq!(id.as_str(), "7d44b88c-4199-4bad-97dc-d78268e01398");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistrationId(String);

impl RegistrationId {
    /// Creates a new RegistrationId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(RegistrationId)` if the ID is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Registration ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the registration ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RegistrationId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RegistrationId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RegistrationId> for String {
    fn from(id: RegistrationId) -> Self {
        id.0
    }
}

impl AsRef<str> for RegistrationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Converts an identifier into something safe to embed in a file name
///
/// Characters outside `[A-Za-z0-9._-]` are replaced with underscores and
/// leading dots are dropped so the result can never name a hidden file or
/// climb out of the target directory.
pub fn to_file_component(value: &str) -> String {
    let sanitized: String = value
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = sanitized.trim_start_matches('.');
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_id_valid() {
        let id = RegistrationId::new("reg-123").unwrap();
        assert_eq!(id.as_str(), "reg-123");
        assert_eq!(id.to_string(), "reg-123");
    }

    #[test]
    fn test_registration_id_blank_rejected() {
        assert!(RegistrationId::new("").is_err());
        assert!(RegistrationId::new("   ").is_err());
    }

    #[test]
    fn test_registration_id_serde() {
        let id: RegistrationId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id.as_str(), "abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");

        let blank = serde_json::from_str::<RegistrationId>("\"\"");
        assert!(blank.is_err());
    }

    #[test]
    fn test_to_file_component() {
        assert_eq!(to_file_component("CAMP-001"), "CAMP-001");
        assert_eq!(to_file_component("a b/c"), "a_b_c");
        assert_eq!(to_file_component("../etc"), "_etc");
        assert_eq!(to_file_component("..."), "_");
    }
}
