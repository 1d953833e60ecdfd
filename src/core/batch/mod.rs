//! Batch pipeline orchestration
//!
//! - [`coordinator`] - export, distribution and single-token workflows
//! - [`distribution`] - aggregated distribution outcome
//! - [`progress`] - observable export progress with delayed reset
//! - [`output`] - saved token file naming and writing

pub mod coordinator;
pub mod distribution;
pub mod output;
pub mod progress;

pub use coordinator::{BatchCoordinator, CoordinatorSettings};
pub use distribution::DistributionResult;
pub use output::TokenOutput;
pub use progress::{ProgressState, ProgressTracker};
