//! Shared test doubles for the batch coordinator

#![allow(dead_code)]

use async_trait::async_trait;
use lanyard::adapters::mail::{MailMessage, MailTransport};
use lanyard::adapters::render::{CardRenderer, DocumentAssembler, ExportedDocument, TokenEncoder};
use lanyard::core::batch::{BatchCoordinator, CoordinatorSettings};
use lanyard::domain::{ImageArtifact, LanyardError, Registration, Result, TransportError};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub fn registration(id: &str, first: &str, last: &str, email: Option<&str>) -> Registration {
    let mut builder = Registration::builder()
        .id(id)
        .unwrap()
        .camper_code(format!("CAMP-{id}"))
        .first_name(first)
        .last_name(last);
    if let Some(email) = email {
        builder = builder.email(email);
    }
    builder.build().unwrap()
}

/// Encoder producing the registration id as bytes
#[derive(Default)]
pub struct StubEncoder {
    pub fail: bool,
}

#[async_trait]
impl TokenEncoder for StubEncoder {
    async fn encode(&self, registration: &Registration) -> Result<ImageArtifact> {
        if self.fail {
            return Err(LanyardError::Render("encoder offline".to_string()));
        }
        Ok(ImageArtifact::png(registration.id.as_str().as_bytes().to_vec()))
    }
}

/// Renderer that fails for selected registration ids
#[derive(Default)]
pub struct StubRenderer {
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl StubRenderer {
    pub fn failing_for(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|id| id.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CardRenderer for StubRenderer {
    async fn render(&self, registration: &Registration) -> Result<ImageArtifact> {
        let id = registration.id.as_str().to_string();
        self.calls.lock().unwrap().push(id.clone());
        if self.failing.contains(&id) {
            return Err(LanyardError::Render(format!("card layout failed for {id}")));
        }
        Ok(ImageArtifact::png(format!("card-{id}").into_bytes()))
    }
}

/// Transport recording every message, with per-address failures and delays
#[derive(Default)]
pub struct RecordingTransport {
    failures: HashMap<String, TransportError>,
    delays: HashMap<String, Duration>,
    sent: Mutex<Vec<MailMessage>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(mut self, address: &str, error: TransportError) -> Self {
        self.failures.insert(address.to_string(), error);
        self
    }

    pub fn delay_for(mut self, address: &str, delay: Duration) -> Self {
        self.delays.insert(address.to_string(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: &MailMessage) -> std::result::Result<(), TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&message.to) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(error) = self.failures.get(&message.to) {
            return Err(error.clone());
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Assembler that can be held open until released, or made to fail
pub struct GatedAssembler {
    pub per_page: usize,
    gate: Option<Arc<Notify>>,
    started: Arc<Notify>,
    failure: Option<String>,
}

impl GatedAssembler {
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page,
            gate: None,
            started: Arc::new(Notify::new()),
            failure: None,
        }
    }

    /// Blocks `assemble` until the returned handle is notified
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Notified once `assemble` has been entered
    pub fn started(&self) -> Arc<Notify> {
        Arc::clone(&self.started)
    }
}

#[async_trait]
impl DocumentAssembler for GatedAssembler {
    fn estimate_pages(&self, count: usize) -> usize {
        count.div_ceil(self.per_page)
    }

    async fn assemble(&self, registrations: &[Registration]) -> Result<ExportedDocument> {
        self.started.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(message) = &self.failure {
            return Err(LanyardError::Render(message.clone()));
        }
        Ok(ExportedDocument {
            name: "cards".to_string(),
            location: PathBuf::from("out/cards"),
            page_count: self.estimate_pages(registrations.len()),
            registration_count: registrations.len(),
        })
    }
}

pub fn coordinator(
    renderer: Arc<StubRenderer>,
    assembler: GatedAssembler,
    transport: Arc<RecordingTransport>,
    settings: CoordinatorSettings,
) -> BatchCoordinator {
    BatchCoordinator::new(
        Arc::new(StubEncoder::default()),
        renderer,
        Arc::new(assembler),
        transport,
        settings,
    )
}
