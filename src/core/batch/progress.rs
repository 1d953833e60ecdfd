//! Export progress state
//!
//! Progress is owned by one coordinator and published through a
//! `tokio::sync::watch` channel. After an export settles, the final message
//! stays visible for a configured delay and then a timer task resets the
//! state to idle. Starting a new export aborts that timer.

use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// What a caller sees of the current export
///
/// `active == false` always comes with an empty message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    pub active: bool,
    pub message: String,
}

impl ProgressState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn active(message: impl Into<String>) -> Self {
        Self {
            active: true,
            message: message.into(),
        }
    }
}

/// Messages shown during an export
pub mod messages {
    use crate::adapters::render::ExportedDocument;

    pub const PREPARING: &str = "Preparing export...";
    pub const COUNTING: &str = "Counting pages...";

    pub fn generating(registrations: usize, pages: usize) -> String {
        format!(
            "Generating {} {} ({} {})...",
            registrations,
            plural(registrations, "registration", "registrations"),
            pages,
            plural(pages, "page", "pages")
        )
    }

    pub fn completed(document: &ExportedDocument) -> String {
        format!(
            "Export complete: {} {} written to {}",
            document.page_count,
            plural(document.page_count, "page", "pages"),
            document.location.display()
        )
    }

    pub fn failed(detail: &str) -> String {
        format!("Export failed: {detail}")
    }

    fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
        if count == 1 {
            one
        } else {
            many
        }
    }
}

/// Publishes progress and owns the delayed reset
pub struct ProgressTracker {
    sender: Arc<watch::Sender<ProgressState>>,
    /// Bumped on every publish; a timer may only reset the epoch it was
    /// armed for. Held while sending so check and send cannot interleave.
    epoch: Arc<Mutex<u64>>,
    pending_reset: Mutex<Option<JoinHandle<()>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(ProgressState::idle());
        Self {
            sender: Arc::new(sender),
            epoch: Arc::new(Mutex::new(0)),
            pending_reset: Mutex::new(None),
        }
    }

    /// Snapshot of the current state
    pub fn current(&self) -> ProgressState {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressState> {
        self.sender.subscribe()
    }

    /// Shows `message` as active, cancelling any pending reset
    pub fn set(&self, message: impl Into<String>) {
        self.publish(ProgressState::active(message));
    }

    /// Shows a final `message`, then resets to idle after `display_for`
    ///
    /// Must be called from within a tokio runtime when `display_for` is
    /// non-zero.
    pub fn finish(&self, message: impl Into<String>, display_for: Duration) {
        let armed = self.publish(ProgressState::active(message));

        if display_for.is_zero() {
            self.publish(ProgressState::idle());
            return;
        }

        let epoch = Arc::clone(&self.epoch);
        let sender = Arc::clone(&self.sender);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(display_for).await;
            if reset_if_current(&epoch, &sender, armed) {
                tracing::trace!("Progress reset to idle");
            }
        });

        let mut pending = self
            .pending_reset
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Returns to idle immediately
    pub fn reset(&self) {
        self.publish(ProgressState::idle());
    }

    /// Whether a delayed reset is still waiting to fire
    pub fn has_pending_reset(&self) -> bool {
        self.pending_reset
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Sends `state` under a new epoch and returns that epoch
    fn publish(&self, state: ProgressState) -> u64 {
        let current = {
            let mut epoch = self.epoch.lock().unwrap_or_else(PoisonError::into_inner);
            *epoch += 1;
            self.sender.send_replace(state);
            *epoch
        };

        let pending = self
            .pending_reset
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = pending {
            handle.abort();
        }
        current
    }
}

/// Resets to idle only if nothing was published since `armed`
fn reset_if_current(
    epoch: &Mutex<u64>,
    sender: &watch::Sender<ProgressState>,
    armed: u64,
) -> bool {
    let epoch = epoch.lock().unwrap_or_else(PoisonError::into_inner);
    if *epoch != armed {
        return false;
    }
    sender.send_replace(ProgressState::idle());
    true
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        let pending = self
            .pending_reset
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = pending {
            handle.abort();
        }
    }
}
