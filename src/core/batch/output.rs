//! Saved token files
//!
//! Tokens are written as `<prefix>_<camper_code-or-id>.<ext>`. The bytes go
//! to a hidden `.part` file first and are renamed into place, so a failed
//! write never leaves a truncated token behind.

use crate::config::OutputConfig;
use crate::domain::ids::to_file_component;
use crate::domain::{ImageArtifact, LanyardError, Registration, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File naming for saved tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOutput {
    prefix: String,
    extension: String,
}

impl TokenOutput {
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.token_prefix, &config.token_extension)
    }

    /// Deterministic file name for `registration`
    pub fn file_name(&self, registration: &Registration) -> String {
        format!(
            "{}_{}.{}",
            self.prefix,
            to_file_component(registration.code()),
            self.extension
        )
    }

    /// Writes `token` into `directory`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns `Io` if the directory cannot be created or the file cannot be
    /// written; the partial file is removed in that case.
    pub fn write(
        &self,
        registration: &Registration,
        token: &ImageArtifact,
        directory: &Path,
    ) -> Result<PathBuf> {
        fs::create_dir_all(directory).map_err(|e| {
            LanyardError::Io(format!("Failed to create {}: {}", directory.display(), e))
        })?;

        let file_name = self.file_name(registration);
        let target = directory.join(&file_name);
        let partial = PartialFile::new(directory.join(format!(".{file_name}.part")));

        {
            let mut file = File::create(partial.path()).map_err(|e| {
                LanyardError::Io(format!("Failed to create {}: {}", partial.path().display(), e))
            })?;
            file.write_all(token.bytes())?;
            file.sync_all()?;
        }

        fs::rename(partial.path(), &target).map_err(|e| {
            LanyardError::Io(format!("Failed to move token to {}: {}", target.display(), e))
        })?;
        partial.commit();

        tracing::info!(
            registration_id = %registration.id,
            path = %target.display(),
            bytes = token.len(),
            "Saved token"
        );

        Ok(target)
    }
}

impl Default for TokenOutput {
    fn default() -> Self {
        Self::from_config(&OutputConfig::default())
    }
}

/// Temporary file removed on drop unless committed
struct PartialFile {
    path: PathBuf,
    committed: bool,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.committed && self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove partial file");
            }
        }
    }
}
