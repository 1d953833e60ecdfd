//! Registration records loaded from JSON exports
//!
//! The registration backend exports either a bare array or an object with a
//! `registrations` array:
//!
//! ```json
//! {"registrations": [{"id": "reg-1", "camperCode": "CAMP-001", "email": "ada@example.com"}]}
//! ```

use crate::domain::{LanyardError, Registration, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum RegistrationFile {
    List(Vec<Registration>),
    Wrapped { registrations: Vec<Registration> },
}

/// Reads registrations from `path`, keeping file order
///
/// # Errors
///
/// Returns `Io` when the file cannot be read and `Serialization` when it is
/// not a registration export (including records with a blank `id`).
pub fn load_registrations(path: impl AsRef<Path>) -> Result<Vec<Registration>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|e| LanyardError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    let registrations = parse_registrations(&contents).map_err(|e| match e {
        LanyardError::Serialization(msg) => {
            LanyardError::Serialization(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })?;

    tracing::info!(
        path = %path.display(),
        count = registrations.len(),
        "Loaded registrations"
    );

    Ok(registrations)
}

/// Parses a registration export held in memory
pub fn parse_registrations(contents: &str) -> Result<Vec<Registration>> {
    let file: RegistrationFile = serde_json::from_str(contents)?;
    let registrations = match file {
        RegistrationFile::List(list) => list,
        RegistrationFile::Wrapped { registrations } => registrations,
    };

    let mut seen = HashSet::new();
    for registration in &registrations {
        if !seen.insert(registration.id.as_str()) {
            tracing::warn!(id = %registration.id, "Duplicate registration id in export");
        }
    }

    Ok(registrations)
}

/// Picks the registrations named in `ids`, in the order requested
///
/// An empty `ids` selects everything.
///
/// # Errors
///
/// Returns `Validation` naming every id that is not present.
pub fn select_registrations(all: &[Registration], ids: &[String]) -> Result<Vec<Registration>> {
    if ids.is_empty() {
        return Ok(all.to_vec());
    }

    let mut selected = Vec::with_capacity(ids.len());
    let mut missing = Vec::new();
    for id in ids {
        match all.iter().find(|r| r.id.as_str() == id) {
            Some(registration) => selected.push(registration.clone()),
            None => missing.push(id.as_str()),
        }
    }

    if !missing.is_empty() {
        return Err(LanyardError::Validation(format!(
            "Unknown registration id(s): {}",
            missing.join(", ")
        )));
    }

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_bare_array() {
        let registrations = parse_registrations(
            r#"[{"id": "reg-1", "camperCode": "CAMP-001"}, {"id": "reg-2", "email": ""}]"#,
        )
        .unwrap();
        assert_eq!(registrations.len(), 2);
        assert_eq!(registrations[0].code(), "CAMP-001");
        assert!(registrations[1].deliverable_email().is_none());
    }

    #[test]
    fn test_parse_wrapped_object() {
        let registrations = parse_registrations(
            r#"{"registrations": [{"id": "reg-9", "firstName": "Grace", "lastName": "Hopper"}]}"#,
        )
        .unwrap();
        assert_eq!(registrations[0].display_name(), "Grace Hopper");
    }

    #[test]
    fn test_parse_rejects_blank_id() {
        let result = parse_registrations(r#"[{"id": "  "}]"#);
        assert!(matches!(result, Err(LanyardError::Serialization(_))));
    }

    #[test]
    fn test_load_registrations_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"[{"id": "reg-1"}]"#).unwrap();
        file.flush().unwrap();

        let registrations = load_registrations(file.path()).unwrap();
        assert_eq!(registrations.len(), 1);
    }

    #[test]
    fn test_load_registrations_missing_file() {
        let result = load_registrations("does-not-exist.json");
        assert!(matches!(result, Err(LanyardError::Io(_))));
    }

    #[test]
    fn test_select_registrations() {
        let all = parse_registrations(r#"[{"id": "a"}, {"id": "b"}, {"id": "c"}]"#).unwrap();

        let picked = select_registrations(&all, &["c".to_string(), "a".to_string()]).unwrap();
        let ids: Vec<&str> = picked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);

        assert_eq!(select_registrations(&all, &[]).unwrap().len(), 3);

        let err = select_registrations(&all, &["zzz".to_string()]).unwrap_err();
        assert!(err.to_string().contains("zzz"));
    }
}
