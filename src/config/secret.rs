//! Secret handling for credentials read from configuration
//!
//! The mail API key is held in a `secrecy::Secret`, which zeroes the memory
//! on drop, redacts `Debug` output and forces callers through
//! `expose_secret()` to read the value.
//!
//! # Example
//!
//! ```rust
//! use lanyard::config::{secret_string, SecretString};
//! use secrecy::ExposeSecret;
//!
//! let api_key: SecretString = secret_string("re_live_123".to_string());
//! assert_eq!(api_key.expose_secret().as_str(), "re_live_123");
//!
//! // Debug output is redacted
//! assert!(!format!("{api_key:?}").contains("re_live_123"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// String newtype carrying the traits `Secret` needs
///
/// Serializes as a plain string; `Debug` never prints the value.
#[derive(Clone, Serialize, Deserialize, Zeroize)]
#[serde(transparent)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue([REDACTED])")
    }
}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl SecretValue {
    /// The secret as a plain string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the value is empty or only whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// A string kept behind `Secret`
pub type SecretString = Secret<SecretValue>;

/// Wraps a plain string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_roundtrip_value() {
        let key = secret_string("mail-key".to_string());
        assert_eq!(key.expose_secret(), "mail-key");
        assert!(!key.expose_secret().is_blank());
        assert!(secret_string("  ".to_string()).expose_secret().is_blank());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let key = secret_string("sensitive-mail-key".to_string());
        let debug_output = format!("{key:?}");
        assert!(!debug_output.contains("sensitive-mail-key"));

        let value = SecretValue::from("sensitive-mail-key".to_string());
        assert_eq!(format!("{value:?}"), "SecretValue([REDACTED])");
    }

    #[test]
    fn test_secret_in_toml() {
        #[derive(Deserialize)]
        struct Section {
            api_key: SecretString,
        }

        let section: Section = toml::from_str("api_key = \"abc123\"").unwrap();
        assert_eq!(section.api_key.expose_secret().as_str(), "abc123");
    }
}
