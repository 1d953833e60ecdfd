//! Batch coordinator - drives export, distribution and single-token retrieval
//!
//! The coordinator never talks to an image or mail backend directly; it goes
//! through the capability traits in [`crate::adapters`].

use super::distribution::DistributionResult;
use super::output::TokenOutput;
use super::progress::{messages, ProgressState, ProgressTracker};
use crate::adapters::mail::{MailMessage, MailTransport};
use crate::adapters::render::{
    BadgeCardRenderer, CardRenderer, DocumentAssembler, ExportedDocument, QrTokenEncoder,
    SheetAssembler, TokenEncoder,
};
use crate::config::LanyardConfig;
use crate::domain::{ImageArtifact, LanyardError, Registration, Result};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use uuid::Uuid;

/// Tunables for a coordinator
#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    /// Subject template, `{name}` and `{code}` are filled per recipient
    pub subject: String,
    /// Messages in flight at once; 1 sends strictly one after another
    pub max_concurrent_sends: usize,
    /// How long the completion message stays visible
    pub success_reset: Duration,
    /// How long the failure message stays visible
    pub failure_reset: Duration,
    pub token_output: TokenOutput,
}

impl CoordinatorSettings {
    pub fn from_config(config: &LanyardConfig) -> Self {
        Self {
            subject: config.mail.subject.clone(),
            max_concurrent_sends: config.mail.max_concurrent_sends,
            success_reset: Duration::from_millis(config.progress.success_reset_ms),
            failure_reset: Duration::from_millis(config.progress.failure_reset_ms),
            token_output: TokenOutput::from_config(&config.output),
        }
    }
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self::from_config(&LanyardConfig::default())
    }
}

/// Batch coordinator
///
/// # Example
///
/// ```rust,no_run
/// use lanyard::adapters::mail::HttpMailTransport;
/// use lanyard::config::load_config;
/// use lanyard::core::batch::BatchCoordinator;
/// use std::sync::Arc;
///
/// # async fn example(registrations: Vec<lanyard::domain::Registration>) -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("lanyard.toml")?;
/// let transport = Arc::new(HttpMailTransport::new(&config.mail)?);
/// let coordinator = BatchCoordinator::from_config(&config, transport);
///
/// let result = coordinator.distribute(&registrations).await?;
/// println!("Sent {}, failed {}", result.success, result.failed);
/// # Ok(())
/// # }
/// ```
pub struct BatchCoordinator {
    encoder: Arc<dyn TokenEncoder>,
    renderer: Arc<dyn CardRenderer>,
    assembler: Arc<dyn DocumentAssembler>,
    transport: Arc<dyn MailTransport>,
    settings: CoordinatorSettings,
    progress: ProgressTracker,
    exporting: AtomicBool,
}

impl BatchCoordinator {
    /// Create a coordinator from explicit collaborators
    pub fn new(
        encoder: Arc<dyn TokenEncoder>,
        renderer: Arc<dyn CardRenderer>,
        assembler: Arc<dyn DocumentAssembler>,
        transport: Arc<dyn MailTransport>,
        settings: CoordinatorSettings,
    ) -> Self {
        Self {
            encoder,
            renderer,
            assembler,
            transport,
            settings,
            progress: ProgressTracker::new(),
            exporting: AtomicBool::new(false),
        }
    }

    /// Create a coordinator with the default QR encoder, badge renderer and
    /// sheet assembler
    pub fn from_config(config: &LanyardConfig, transport: Arc<dyn MailTransport>) -> Self {
        let encoder: Arc<dyn TokenEncoder> = Arc::new(QrTokenEncoder::from_layout(&config.layout));
        let renderer: Arc<dyn CardRenderer> = Arc::new(BadgeCardRenderer::new(
            Arc::clone(&encoder),
            config.layout.card_width_px,
            config.layout.card_height_px,
        ));
        let assembler = Arc::new(SheetAssembler::new(
            Arc::clone(&renderer),
            config.layout.clone(),
            &config.output.directory,
            &config.output.document_name,
        ));

        Self::new(
            encoder,
            renderer,
            assembler,
            transport,
            CoordinatorSettings::from_config(config),
        )
    }

    /// Current export progress
    pub fn progress(&self) -> ProgressState {
        self.progress.current()
    }

    /// Receiver notified on every progress change
    pub fn subscribe(&self) -> watch::Receiver<ProgressState> {
        self.progress.subscribe()
    }

    /// Whether an export is running right now
    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }

    /// Assemble `registrations` into one document
    ///
    /// Progress moves through preparing, counting and generating, then shows
    /// a completion or failure message that resets to idle after the
    /// configured delay.
    ///
    /// # Errors
    ///
    /// - `EmptySelection` for an empty slice, with progress untouched
    /// - `Busy` while another export on this coordinator is running
    /// - `Export` when the assembler fails, after progress shows the failure
    pub async fn export(&self, registrations: &[Registration]) -> Result<ExportedDocument> {
        if registrations.is_empty() {
            return Err(LanyardError::EmptySelection);
        }

        let mut flight = ExportFlight::acquire(&self.exporting, &self.progress)
            .ok_or(LanyardError::Busy)?;

        let run_id = Uuid::new_v4();
        let start_time = Instant::now();
        tracing::info!(%run_id, registrations = registrations.len(), "Starting export");

        self.progress.set(messages::PREPARING);
        tokio::task::yield_now().await;

        self.progress.set(messages::COUNTING);
        let pages = self.assembler.estimate_pages(registrations.len());
        tokio::task::yield_now().await;

        self.progress
            .set(messages::generating(registrations.len(), pages));

        let outcome = self.assembler.assemble(registrations).await;
        flight.settle();

        match outcome {
            Ok(document) => {
                self.progress
                    .finish(messages::completed(&document), self.settings.success_reset);
                tracing::info!(
                    %run_id,
                    document = %document.name,
                    pages = document.page_count,
                    estimated_pages = pages,
                    duration_ms = start_time.elapsed().as_millis() as u64,
                    "Export completed"
                );
                Ok(document)
            }
            Err(e) => {
                let detail = e.detail();
                self.progress
                    .finish(messages::failed(&detail), self.settings.failure_reset);
                tracing::error!(%run_id, error = %detail, "Export failed");
                Err(LanyardError::Export(detail))
            }
        }
    }

    /// Render and mail a card to every registration with an email address
    ///
    /// Registrations without an address are skipped. A failing registration
    /// is recorded in the result and never stops the rest of the batch.
    ///
    /// # Errors
    ///
    /// - `EmptySelection` for an empty slice
    /// - `NoDeliverableRecipients` when nobody has an address; no message is sent
    pub async fn distribute(&self, registrations: &[Registration]) -> Result<DistributionResult> {
        if registrations.is_empty() {
            return Err(LanyardError::EmptySelection);
        }

        let run_id = Uuid::new_v4();
        let start_time = Instant::now();
        let (deliverable, skipped): (Vec<&Registration>, Vec<&Registration>) = registrations
            .iter()
            .partition(|registration| registration.deliverable_email().is_some());

        if !skipped.is_empty() {
            tracing::info!(
                skipped = skipped.len(),
                "Skipping registrations without an email address"
            );
        }

        if deliverable.is_empty() {
            return Err(LanyardError::NoDeliverableRecipients);
        }

        tracing::info!(
            %run_id,
            recipients = deliverable.len(),
            max_concurrent_sends = self.settings.max_concurrent_sends,
            "Starting distribution"
        );

        // `buffered` yields outcomes in input order whatever order they finish in
        let outcomes: Vec<(String, Result<()>)> = stream::iter(deliverable)
            .map(|registration| async move {
                (registration.display_name(), self.deliver(registration).await)
            })
            .buffered(self.settings.max_concurrent_sends.max(1))
            .collect()
            .await;

        let mut result = DistributionResult::new();
        result.skipped = skipped.len();
        for (name, outcome) in outcomes {
            match outcome {
                Ok(()) => result.add_success(),
                Err(e) => result.add_failure(&name, &e.detail()),
            }
        }

        let result = result.with_duration(start_time.elapsed());
        tracing::debug!(%run_id, "Distribution finished");
        result.log_summary();
        Ok(result)
    }

    /// Generate the token for one registration
    ///
    /// # Errors
    ///
    /// `Generation` when the encoder fails; there is no retry.
    pub async fn retrieve_token(&self, registration: &Registration) -> Result<ImageArtifact> {
        self.encoder
            .encode(registration)
            .await
            .map_err(|e| match e {
                LanyardError::Generation(_) => e,
                other => LanyardError::Generation(other.detail()),
            })
    }

    /// Generate the token for one registration and save it under `directory`
    pub async fn save_token(&self, registration: &Registration, directory: &Path) -> Result<PathBuf> {
        let token = self.retrieve_token(registration).await?;
        self.settings
            .token_output
            .write(registration, &token, directory)
    }

    async fn deliver(&self, registration: &Registration) -> Result<()> {
        let to = registration
            .deliverable_email()
            .ok_or(LanyardError::NoDeliverableRecipients)?;

        let card = self
            .renderer
            .render(registration)
            .await
            .map_err(|e| match e {
                LanyardError::Render(_) => e,
                other => LanyardError::Render(other.detail()),
            })?;

        let message = MailMessage::for_registration(
            registration,
            to,
            &self.settings.subject,
            card.transport_payload(),
        );

        match self.transport.send(&message).await {
            Ok(()) => {
                tracing::debug!(registration_id = %registration.id, "Card delivered");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(registration_id = %registration.id, error = %e, "Delivery failed");
                Err(e.into())
            }
        }
    }
}

/// Single-flight guard for exports
///
/// Dropping an unsettled flight (an abandoned export future) clears the
/// progress state as well as the flag.
struct ExportFlight<'a> {
    flag: &'a AtomicBool,
    progress: &'a ProgressTracker,
    settled: bool,
}

impl<'a> ExportFlight<'a> {
    fn acquire(flag: &'a AtomicBool, progress: &'a ProgressTracker) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self {
            flag,
            progress,
            settled: false,
        })
    }

    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for ExportFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("Export abandoned before completion");
            self.progress.reset();
        }
        self.flag.store(false, Ordering::Release);
    }
}
