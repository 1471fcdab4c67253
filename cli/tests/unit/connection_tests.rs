//! Unit tests for the bounded connection attempt.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use authflow_cli::application::services::connection::connect;
use authflow_cli::domain::{
    ConnectionOutcome, ConnectionParameters, IdentityToken, LocatorEndpoint, PlayerCredentials,
    ServiceError, SessionToken,
};

use crate::mocks::{FakeTransport, TransportBehavior};

fn endpoint() -> LocatorEndpoint {
    LocatorEndpoint {
        host: "localhost".into(),
        port: 9876,
        insecure: true,
    }
}

fn credentials() -> PlayerCredentials {
    PlayerCredentials {
        identity: IdentityToken::new("pit"),
        session: SessionToken::new("login"),
    }
}

async fn attempt(behavior: TransportBehavior, timeout: Duration) -> (FakeTransport, ConnectionOutcome) {
    let transport = FakeTransport::new(behavior);
    let result = connect(
        &transport,
        &endpoint(),
        &credentials(),
        &ConnectionParameters::default(),
        timeout,
    )
    .await;
    assert_eq!(result.deadline, timeout);
    (transport, result.outcome)
}

#[tokio::test]
async fn test_connected_presents_both_tokens() {
    let (transport, outcome) =
        attempt(TransportBehavior::Answer(true), Duration::from_millis(5000)).await;
    assert_eq!(outcome, ConnectionOutcome::Connected);
    assert_eq!(transport.seen(), vec![("pit".into(), "login".into())]);
}

#[tokio::test]
async fn test_locator_without_connection_is_refused() {
    let (_, outcome) = attempt(TransportBehavior::Answer(false), Duration::from_millis(5000)).await;
    assert!(matches!(outcome, ConnectionOutcome::Refused { .. }));
}

#[tokio::test]
async fn test_transport_error_is_refused_not_fatal() {
    let (_, outcome) = attempt(
        TransportBehavior::Fail(ServiceError::Rejected("bad login token".into())),
        Duration::from_millis(5000),
    )
    .await;
    assert_eq!(
        outcome,
        ConnectionOutcome::Refused {
            reason: "rejected: bad login token".into()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_hanging_locator_times_out_at_deadline() {
    let started = tokio::time::Instant::now();
    let (transport, outcome) = attempt(TransportBehavior::Hang, Duration::from_millis(5000)).await;

    assert_eq!(outcome, ConnectionOutcome::TimedOut { after_ms: 5000 });
    assert_eq!(started.elapsed(), Duration::from_millis(5000));
    assert_eq!(transport.seen().len(), 1, "exactly one attempt");
}

// --- Token binding: a login token only works for its own player and a running deployment ---

async fn present(transport: &FakeTransport, identity: &str, session: &str) -> ConnectionOutcome {
    let credentials = PlayerCredentials {
        identity: IdentityToken::new(identity),
        session: SessionToken::new(session),
    };
    connect(
        transport,
        &endpoint(),
        &credentials,
        &ConnectionParameters::default(),
        Duration::from_millis(5000),
    )
    .await
    .outcome
}

#[tokio::test]
async fn test_login_token_accepted_with_its_identity_and_deployment() {
    let transport = FakeTransport::verifying(&["100"]);
    let outcome = present(&transport, "pit-alice", "login-pit-alice-100").await;
    assert_eq!(outcome, ConnectionOutcome::Connected);
}

#[tokio::test]
async fn test_login_token_refused_with_swapped_identity() {
    let transport = FakeTransport::verifying(&["100"]);
    let outcome = present(&transport, "pit-bob", "login-pit-alice-100").await;
    assert!(matches!(outcome, ConnectionOutcome::Refused { .. }), "{outcome:?}");
}

#[tokio::test]
async fn test_login_token_refused_for_other_deployment() {
    let transport = FakeTransport::verifying(&["100"]);
    let outcome = present(&transport, "pit-alice", "login-pit-alice-101").await;
    assert!(matches!(outcome, ConnectionOutcome::Refused { .. }), "{outcome:?}");
}

#[tokio::test]
async fn test_login_token_refused_once_deployment_is_not_running() {
    let transport = FakeTransport::verifying(&[]);
    let outcome = present(&transport, "pit-alice", "login-pit-alice-100").await;
    assert!(matches!(outcome, ConnectionOutcome::Refused { .. }), "{outcome:?}");
}
