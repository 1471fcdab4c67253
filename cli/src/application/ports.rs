//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;

use anyhow::Result;

use crate::domain::{
    ConnectionParameters, CreateRequest, FlowConfig, IdentityRequest, IdentityToken, LocatorEndpoint,
    PlayerCredentials, ResourceDescriptor, ServiceError, SessionRequest, SessionToken,
};

// ── Deployment Port ───────────────────────────────────────────────────────────

/// Remote deployment service: create, poll, list, stop.
#[allow(async_fn_in_trait)]
pub trait DeploymentService {
    /// Submit a create request. The returned descriptor carries the assigned
    /// id and the status at acceptance time (normally `Starting`).
    async fn create_deployment(
        &self,
        request: &CreateRequest,
    ) -> Result<ResourceDescriptor, ServiceError>;

    /// Fetch the current state of one deployment.
    async fn get_deployment(
        &self,
        project_name: &str,
        id: &str,
    ) -> Result<ResourceDescriptor, ServiceError>;

    /// All deployments visible in the project.
    async fn list_deployments(
        &self,
        project_name: &str,
    ) -> Result<Vec<ResourceDescriptor>, ServiceError>;

    /// Stop a deployment.
    async fn stop_deployment(&self, project_name: &str, id: &str) -> Result<(), ServiceError>;
}

// ── Token Ports ───────────────────────────────────────────────────────────────

/// Exchanges a (provider, player identifier) pair for a player identity token.
#[allow(async_fn_in_trait)]
pub trait PlayerIdentityTokenService {
    async fn create_player_identity_token(
        &self,
        request: &IdentityRequest,
    ) -> Result<IdentityToken, ServiceError>;
}

/// Exchanges a player identity token and deployment id for a login token.
#[allow(async_fn_in_trait)]
pub trait LoginTokenService {
    async fn create_login_token(
        &self,
        request: &SessionRequest<'_>,
    ) -> Result<SessionToken, ServiceError>;
}

// ── Connection Port ───────────────────────────────────────────────────────────

/// Low-level worker connection through a locator.
///
/// Implementations make a single attempt and do not apply their own
/// deadline; the caller bounds the call.
#[allow(async_fn_in_trait)]
pub trait LocatorTransport {
    /// Returns `Ok(true)` when the locator admitted the worker and the
    /// connection is live, `Ok(false)` when the locator answered but the
    /// worker is not connected.
    async fn connect(
        &self,
        endpoint: &LocatorEndpoint,
        credentials: &PlayerCredentials,
        parameters: &ConnectionParameters,
    ) -> Result<bool, ServiceError>;
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts loading the workflow configuration.
pub trait ConfigStore {
    /// Load the configuration, returning defaults when none is stored.
    fn load(&self) -> Result<FlowConfig>;
    /// Location the configuration is read from.
    fn path(&self) -> Result<PathBuf>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

/// Reporter that drops every message.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}
