//! Integration tests for card distribution

mod common;

use common::{coordinator, registration, GatedAssembler, RecordingTransport, StubRenderer};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use lanyard::core::batch::CoordinatorSettings;
use lanyard::domain::{LanyardError, Registration, TransportError};
use std::sync::Arc;
use std::time::Duration;

fn settings(max_concurrent_sends: usize) -> CoordinatorSettings {
    CoordinatorSettings {
        subject: "Your card, {name} ({code})".to_string(),
        max_concurrent_sends,
        ..CoordinatorSettings::default()
    }
}

fn fake_registrations(count: usize) -> Vec<Registration> {
    (0..count)
        .map(|i| {
            let first: String = FirstName().fake();
            let last: String = LastName().fake();
            let email = format!("person{i}@example.com");
            registration(&format!("r{i}"), &first, &last, Some(&email))
        })
        .collect()
}

#[tokio::test]
async fn test_all_recipients_delivered() {
    let transport = Arc::new(RecordingTransport::new());
    let renderer = Arc::new(StubRenderer::default());
    let coordinator = coordinator(
        Arc::clone(&renderer),
        GatedAssembler::new(4),
        Arc::clone(&transport),
        settings(1),
    );
    let registrations = fake_registrations(3);

    let result = coordinator.distribute(&registrations).await.unwrap();

    assert_eq!(result.success, 3);
    assert_eq!(result.failed, 0);
    assert!(result.errors.is_empty());
    assert!(result.is_successful());
    assert_eq!(transport.calls(), 3);

    let sent = transport.sent();
    for (message, registration) in sent.iter().zip(&registrations) {
        assert_eq!(message.to, registration.email.clone().unwrap());
        assert_eq!(message.name, registration.display_name());
        assert_eq!(message.camper_code, registration.code());
        assert_eq!(
            message.subject,
            format!("Your card, {} ({})", registration.display_name(), registration.code())
        );
        assert!(!message.payload.starts_with("data:"));
    }
}

#[tokio::test]
async fn test_missing_email_is_skipped() {
    let transport = Arc::new(RecordingTransport::new());
    let coordinator = coordinator(
        Arc::new(StubRenderer::default()),
        GatedAssembler::new(4),
        Arc::clone(&transport),
        settings(1),
    );
    let registrations = vec![
        registration("r1", "Ada", "Lovelace", Some("ada@example.com")),
        registration("r2", "Alan", "Turing", Some("")),
        registration("r3", "Grace", "Hopper", None),
        registration("r4", "Edsger", "Dijkstra", Some("   ")),
    ];

    let result = coordinator.distribute(&registrations).await.unwrap();

    assert_eq!(transport.calls(), 1);
    assert_eq!(result.success, 1);
    assert_eq!(result.failed, 0);
    assert_eq!(result.skipped, 3);
    assert_eq!(result.attempted(), 1);
}

#[tokio::test]
async fn test_transport_failure_is_isolated() {
    let transport = Arc::new(RecordingTransport::new().fail_for(
        "alan@example.com",
        TransportError::Failed("Mailbox unavailable".to_string()),
    ));
    let renderer = Arc::new(StubRenderer::default());
    let coordinator = coordinator(
        Arc::clone(&renderer),
        GatedAssembler::new(4),
        Arc::clone(&transport),
        settings(1),
    );
    let registrations = vec![
        registration("r1", "Ada", "Lovelace", Some("ada@example.com")),
        registration("r2", "Alan", "Turing", Some("alan@example.com")),
        registration("r3", "Grace", "Hopper", Some("grace@example.com")),
    ];

    let result = coordinator.distribute(&registrations).await.unwrap();

    assert_eq!(result.success, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(result.errors, vec!["Alan Turing: Mailbox unavailable".to_string()]);
    assert_eq!(renderer.calls(), vec!["r1", "r2", "r3"]);
    assert_eq!(transport.calls(), 3);
    assert_eq!(transport.sent().last().unwrap().to, "grace@example.com");
}

#[tokio::test]
async fn test_render_failure_is_isolated() {
    let transport = Arc::new(RecordingTransport::new());
    let coordinator = coordinator(
        Arc::new(StubRenderer::failing_for(&["r2"])),
        GatedAssembler::new(4),
        Arc::clone(&transport),
        settings(1),
    );
    let registrations = fake_registrations(5);

    let result = coordinator.distribute(&registrations).await.unwrap();

    assert_eq!(result.failed, 1);
    assert_eq!(result.success, 4);
    assert_eq!(transport.calls(), 4);
    assert_eq!(
        result.errors,
        vec![format!(
            "{}: card layout failed for r2",
            registrations[2].display_name()
        )]
    );
}

#[tokio::test]
async fn test_empty_selection_never_touches_transport() {
    let transport = Arc::new(RecordingTransport::new());
    let coordinator = coordinator(
        Arc::new(StubRenderer::default()),
        GatedAssembler::new(4),
        Arc::clone(&transport),
        settings(1),
    );

    let err = coordinator.distribute(&[]).await.unwrap_err();
    assert!(matches!(err, LanyardError::EmptySelection));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_no_deliverable_recipients() {
    let transport = Arc::new(RecordingTransport::new());
    let renderer = Arc::new(StubRenderer::default());
    let coordinator = coordinator(
        Arc::clone(&renderer),
        GatedAssembler::new(4),
        Arc::clone(&transport),
        settings(1),
    );
    let registrations = vec![
        registration("r1", "Ada", "Lovelace", None),
        registration("r2", "Alan", "Turing", Some("")),
    ];

    let err = coordinator.distribute(&registrations).await.unwrap_err();
    assert!(matches!(err, LanyardError::NoDeliverableRecipients));
    assert_eq!(transport.calls(), 0);
    assert!(renderer.calls().is_empty());
}

#[tokio::test]
async fn test_counts_cover_every_recipient() {
    for size in [1, 2, 7, 12] {
        let registrations = fake_registrations(size);
        let failing: Vec<String> = registrations
            .iter()
            .step_by(3)
            .map(|r| r.email.clone().unwrap())
            .collect();

        let mut transport = RecordingTransport::new();
        for address in &failing {
            transport = transport.fail_for(
                address,
                TransportError::Rejected {
                    status: 502,
                    message: "Bad Gateway".to_string(),
                },
            );
        }
        let coordinator = coordinator(
            Arc::new(StubRenderer::default()),
            GatedAssembler::new(4),
            Arc::new(transport),
            settings(3),
        );

        let result = coordinator.distribute(&registrations).await.unwrap();
        assert_eq!(result.success + result.failed, size);
        assert_eq!(result.failed, failing.len());
        assert_eq!(result.errors.len(), failing.len());
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_sends_keep_error_order() {
    // Earlier recipients finish last, so arrival order is reversed
    let mut transport = RecordingTransport::new();
    for i in 0..4u64 {
        let address = format!("person{i}@example.com");
        transport = transport
            .delay_for(&address, Duration::from_millis(100 * (4 - i)))
            .fail_for(&address, TransportError::Failed(format!("failure {i}")));
    }
    let transport = Arc::new(transport);
    let coordinator = coordinator(
        Arc::new(StubRenderer::default()),
        GatedAssembler::new(4),
        Arc::clone(&transport),
        settings(4),
    );
    let registrations = fake_registrations(4);

    let result = coordinator.distribute(&registrations).await.unwrap();

    let expected: Vec<String> = registrations
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}: failure {i}", r.display_name()))
        .collect();
    assert_eq!(result.errors, expected);
    assert!(transport.max_in_flight() > 1);
    assert!(transport.max_in_flight() <= 4);
}

#[tokio::test(start_paused = true)]
async fn test_single_send_limit_is_sequential() {
    let mut transport = RecordingTransport::new();
    for i in 0..3 {
        transport = transport.delay_for(&format!("person{i}@example.com"), Duration::from_millis(50));
    }
    let transport = Arc::new(transport);
    let coordinator = coordinator(
        Arc::new(StubRenderer::default()),
        GatedAssembler::new(4),
        Arc::clone(&transport),
        settings(1),
    );

    let result = coordinator.distribute(&fake_registrations(3)).await.unwrap();
    assert_eq!(result.success, 3);
    assert_eq!(transport.max_in_flight(), 1);
}
