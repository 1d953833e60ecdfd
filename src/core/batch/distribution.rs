//! Distribution results
//!
//! A [`DistributionResult`] is created fresh for each `distribute` call and
//! handed back to the caller once every deliverable registration has been
//! attempted.

use serde::Serialize;
use std::time::Duration;

/// Aggregate outcome of one distribution run
///
/// `success + failed` always equals the number of registrations that had a
/// deliverable email address. `skipped` counts the others and is informational.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DistributionResult {
    /// Messages accepted by the mail transport
    pub success: usize,

    /// Registrations whose card could not be rendered or delivered
    pub failed: usize,

    /// Registrations left out because they have no email address
    pub skipped: usize,

    /// `"<display name>: <error message>"` per failure, in input order
    pub errors: Vec<String>,

    /// Wall-clock time of the run
    #[serde(skip)]
    pub duration: Duration,
}

impl DistributionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a delivered message
    pub fn add_success(&mut self) {
        self.success += 1;
    }

    /// Record a failed registration
    pub fn add_failure(&mut self, name: &str, message: &str) {
        self.failed += 1;
        self.errors.push(format!("{name}: {message}"));
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Registrations that were attempted
    pub fn attempted(&self) -> usize {
        self.success + self.failed
    }

    /// True when every attempted registration was delivered
    pub fn is_successful(&self) -> bool {
        self.failed == 0
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.attempted() == 0 {
            return 100.0;
        }
        (self.success as f64 / self.attempted() as f64) * 100.0
    }

    /// Log the result
    pub fn log_summary(&self) {
        tracing::info!(
            success = self.success,
            failed = self.failed,
            skipped = self.skipped,
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Distribution completed"
        );

        for error in &self.errors {
            tracing::warn!(error = %error, "Distribution failure");
        }
    }
}
