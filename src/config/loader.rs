//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::LanyardConfig;
use super::secret::secret_string;
use crate::domain::errors::LanyardError;
use crate::domain::result::Result;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into LanyardConfig
/// 4. Applies environment variable overrides (LANYARD_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use lanyard::config::loader::load_config;
///
/// let config = load_config("lanyard.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<LanyardConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LanyardError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LanyardError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: LanyardConfig = toml::from_str(&contents)
        .map_err(|e| LanyardError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        LanyardError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Loads configuration from `path` when it exists, otherwise from defaults
///
/// Environment overrides are applied in both cases, so a deployment can run
/// without a configuration file at all.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<LanyardConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "No configuration file found, using defaults");
    let mut config = LanyardConfig::default();
    apply_env_overrides(&mut config);
    config.validate().map_err(|e| {
        LanyardError::Configuration(format!("Configuration validation failed: {}", e))
    })?;
    Ok(config)
}

/// Replaces `${VAR_NAME}` with the variable's value
///
/// Comment lines are copied untouched so commented-out examples never need
/// their variables set.
///
/// # Errors
///
/// Lists every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let placeholder = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| LanyardError::Configuration(e.to_string()))?;
    let mut missing: Vec<String> = Vec::new();

    let lines: Vec<String> = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_string();
            }
            placeholder
                .replace_all(line, |caps: &Captures| match std::env::var(&caps[1]) {
                    Ok(value) => value,
                    Err(_) => {
                        if !missing.iter().any(|name| name == &caps[1]) {
                            missing.push(caps[1].to_string());
                        }
                        caps[0].to_string()
                    }
                })
                .into_owned()
        })
        .collect();

    if !missing.is_empty() {
        return Err(LanyardError::Configuration(format!(
            "Missing required environment variables: {}",
            missing.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using the LANYARD_* prefix
///
/// Environment variables follow the pattern: LANYARD_<SECTION>_<KEY>
/// For example: LANYARD_MAIL_ENDPOINT, LANYARD_OUTPUT_DIRECTORY
fn apply_env_overrides(config: &mut LanyardConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("LANYARD_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Mail overrides
    if let Ok(val) = std::env::var("LANYARD_MAIL_ENDPOINT") {
        config.mail.endpoint = val;
    }
    if let Ok(val) = std::env::var("LANYARD_MAIL_API_KEY") {
        config.mail.api_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("LANYARD_MAIL_SUBJECT") {
        config.mail.subject = val;
    }
    if let Ok(val) = std::env::var("LANYARD_MAIL_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.mail.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("LANYARD_MAIL_TLS_VERIFY") {
        config.mail.tls_verify = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("LANYARD_MAIL_MAX_CONCURRENT_SENDS") {
        if let Ok(limit) = val.parse() {
            config.mail.max_concurrent_sends = limit;
        }
    }

    // Output overrides
    if let Ok(val) = std::env::var("LANYARD_OUTPUT_DIRECTORY") {
        config.output.directory = val;
    }
    if let Ok(val) = std::env::var("LANYARD_OUTPUT_TOKEN_PREFIX") {
        config.output.token_prefix = val;
    }

    // Progress overrides
    if let Ok(val) = std::env::var("LANYARD_PROGRESS_SUCCESS_RESET_MS") {
        if let Ok(ms) = val.parse() {
            config.progress.success_reset_ms = ms;
        }
    }
    if let Ok(val) = std::env::var("LANYARD_PROGRESS_FAILURE_RESET_MS") {
        if let Ok(ms) = val.parse() {
            config.progress.failure_reset_ms = ms;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("LANYARD_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("LANYARD_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("LANYARD_TEST_SUBST_VAR", "test_value");
        let input = "api_key = \"${LANYARD_TEST_SUBST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "api_key = \"test_value\"");
        std::env::remove_var("LANYARD_TEST_SUBST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("LANYARD_TEST_MISSING_VAR");
        let input = "a = \"${LANYARD_TEST_MISSING_VAR}\"\nb = \"${LANYARD_TEST_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err().to_string();
        assert!(err.ends_with("Missing required environment variables: LANYARD_TEST_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("LANYARD_TEST_COMMENTED_VAR");
        let input = "# api_key = \"${LANYARD_TEST_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-lanyard.toml");
        assert!(matches!(result, Err(LanyardError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[mail]
endpoint = "https://mail.example.com/send"
subject = "Your pass, {name}"

[output]
directory = "out"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.mail.endpoint, "https://mail.example.com/send");
        assert_eq!(config.mail.subject, "Your pass, {name}");
        assert_eq!(config.output.directory, "out");
        assert_eq!(config.output.token_prefix, "qr");
    }
}
