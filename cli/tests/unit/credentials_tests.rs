//! Unit tests for identity and login token issuance.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use authflow_cli::application::services::credentials::{
    issue_identity_token, issue_session_token,
};
use authflow_cli::domain::{
    FlowError, IdentityRequest, IdentityToken, ResourceStatus, ServiceError, SessionRequest,
};

use crate::mocks::{Call, FakePlatform, PROJECT};

fn identity_request(player: &str) -> IdentityRequest {
    IdentityRequest {
        provider: "provider".into(),
        player_identifier: player.into(),
        project_name: PROJECT.into(),
        lifetime: Duration::from_secs(3600),
        metadata: None,
    }
}

fn session_request<'a>(identity: &'a IdentityToken, deployment_id: &'a str) -> SessionRequest<'a> {
    SessionRequest {
        identity,
        deployment_id,
        lifetime: Duration::from_secs(1800),
        worker_type: "UnityClient",
    }
}

#[tokio::test]
async fn test_login_token_is_bound_to_identity_and_deployment() {
    let fake = FakePlatform::new(&[ResourceStatus::Running]);

    let pit = issue_identity_token(&fake, &identity_request("player_identifier"))
        .await
        .expect("identity");
    let login = issue_session_token(&fake, &session_request(&pit, "42"))
        .await
        .expect("login");

    assert_eq!(pit.expose(), "pit-player_identifier");
    assert_eq!(login.expose(), "login-pit-player_identifier-42");
    assert_eq!(
        fake.calls()[1],
        Call::Login {
            identity: "pit-player_identifier".into(),
            deployment_id: "42".into(),
        }
    );
}

#[tokio::test]
async fn test_blank_player_is_rejected_before_any_call() {
    let fake = FakePlatform::new(&[ResourceStatus::Running]);

    let err = issue_identity_token(&fake, &identity_request("  "))
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::InvalidIdentity(_)));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_identity_service_errors_are_classified() {
    let mut fake = FakePlatform::new(&[ResourceStatus::Running]);
    fake.fail_identity = Some(ServiceError::Unavailable("connection reset".into()));
    let err = issue_identity_token(&fake, &identity_request("p")).await.unwrap_err();
    assert_eq!(err, FlowError::AuthServiceUnavailable("connection reset".into()));

    fake.fail_identity = Some(ServiceError::Rejected("unknown provider".into()));
    let err = issue_identity_token(&fake, &identity_request("p")).await.unwrap_err();
    assert_eq!(err, FlowError::InvalidIdentity("unknown provider".into()));
}

#[tokio::test]
async fn test_login_for_unknown_deployment() {
    let mut fake = FakePlatform::new(&[ResourceStatus::Running]);
    fake.fail_login = Some(ServiceError::NotFound("deployment".into()));
    let pit = IdentityToken::new("pit");

    let err = issue_session_token(&fake, &session_request(&pit, "404"))
        .await
        .unwrap_err();

    assert_eq!(err, FlowError::UnknownResource("404".into()));
}

#[tokio::test]
async fn test_login_with_empty_deployment_id_makes_no_call() {
    let fake = FakePlatform::new(&[ResourceStatus::Running]);
    let pit = IdentityToken::new("pit");

    let err = issue_session_token(&fake, &session_request(&pit, ""))
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::UnknownResource(_)));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_login_rejection_is_exchange_failure() {
    let mut fake = FakePlatform::new(&[ResourceStatus::Running]);
    fake.fail_login = Some(ServiceError::Rejected("expired identity token".into()));
    let pit = IdentityToken::new("pit");

    let err = issue_session_token(&fake, &session_request(&pit, "1"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        FlowError::TokenExchangeFailed("expired identity token".into())
    );
}

#[test]
fn test_tokens_are_redacted_in_debug_output() {
    let pit = IdentityToken::new("secret-value");
    assert!(!format!("{pit:?}").contains("secret-value"));
}
