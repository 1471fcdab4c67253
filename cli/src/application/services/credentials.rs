//! Credential issuance: player identity tokens and login tokens.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use crate::application::ports::{LoginTokenService, PlayerIdentityTokenService};
use crate::domain::{
    FlowError, IdentityRequest, IdentityToken, ServiceError, SessionRequest, SessionToken,
};

/// Exchange a player descriptor for a player identity token.
///
/// # Errors
///
/// - [`FlowError::InvalidIdentity`] if the request is malformed or the
///   service rejects the identity.
/// - [`FlowError::AuthServiceUnavailable`] if the service cannot be reached.
pub async fn issue_identity_token(
    service: &impl PlayerIdentityTokenService,
    request: &IdentityRequest,
) -> Result<IdentityToken, FlowError> {
    request.validate()?;
    let token = service
        .create_player_identity_token(request)
        .await
        .map_err(|e| match e {
            ServiceError::Unavailable(msg) => FlowError::AuthServiceUnavailable(msg),
            ServiceError::Rejected(msg) | ServiceError::NotFound(msg) => {
                FlowError::InvalidIdentity(msg)
            }
        })?;
    tracing::info!(
        provider = %request.provider,
        player = %request.player_identifier,
        ttl_secs = request.lifetime.as_secs(),
        "player identity token issued"
    );
    Ok(token)
}

/// Exchange a player identity token for a login token bound to one deployment.
///
/// # Errors
///
/// - [`FlowError::UnknownResource`] if the service does not know the deployment.
/// - [`FlowError::TokenExchangeFailed`] for every other failure.
pub async fn issue_session_token(
    service: &impl LoginTokenService,
    request: &SessionRequest<'_>,
) -> Result<SessionToken, FlowError> {
    if request.deployment_id.is_empty() {
        return Err(FlowError::UnknownResource(String::new()));
    }
    let token = service
        .create_login_token(request)
        .await
        .map_err(|e| match e {
            ServiceError::NotFound(_) => {
                FlowError::UnknownResource(request.deployment_id.to_string())
            }
            ServiceError::Rejected(msg) | ServiceError::Unavailable(msg) => {
                FlowError::TokenExchangeFailed(msg)
            }
        })?;
    tracing::info!(
        deployment = %request.deployment_id,
        worker_type = %request.worker_type,
        ttl_secs = request.lifetime.as_secs(),
        "login token issued"
    );
    Ok(token)
}
