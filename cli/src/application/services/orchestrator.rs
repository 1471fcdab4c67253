//! Application service: the provision → locate → authenticate → connect
//! workflow with guaranteed cleanup.
//!
//! Imports only from `crate::domain` and `crate::application`.
//! All I/O is routed through injected port traits.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::application::cancel::CancelSignal;
use crate::application::ports::{
    DeploymentService, LocatorTransport, LoginTokenService, PlayerIdentityTokenService,
    ProgressReporter,
};
use crate::application::services::provisioner::{ResourceProvisioner, StopOutcome};
use crate::application::services::{connection, credentials, locator};
use crate::domain::{
    ConnectionAttempt, ConnectionParameters, CreateRequest, FlowError, FlowEvent, FlowState,
    IdentityRequest, LocatorEndpoint, PlayerCredentials, PollPolicy, ResourceDescriptor,
    ResourceKey, ResourceStatus, SessionRequest, StopPolicy,
};

// ── Inputs ────────────────────────────────────────────────────────────────────

/// Which field of the created deployment the locator step looks up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupBy {
    #[default]
    Id,
    Name,
}

impl LookupBy {
    fn key_for(self, resource: &ResourceDescriptor) -> ResourceKey {
        match self {
            Self::Id => ResourceKey::Id(resource.id.clone()),
            Self::Name => ResourceKey::Name(resource.name.clone()),
        }
    }
}

/// Everything one scenario run needs to know, resolved up front.
#[derive(Debug, Clone)]
pub struct ScenarioPlan {
    /// Scenario label used in logs and reports (e.g. `cloud`, `local`).
    pub label: String,
    pub create: CreateRequest,
    pub identity: IdentityRequest,
    pub session_ttl: Duration,
    pub endpoint: LocatorEndpoint,
    pub parameters: ConnectionParameters,
    pub connect_timeout: Duration,
    pub poll: PollPolicy,
    pub stop: StopPolicy,
    pub lookup: LookupBy,
}

/// The four remote collaborators of a run.
pub struct Platform<'a, D, I, L, T> {
    pub deployments: &'a D,
    pub identity: &'a I,
    pub login: &'a L,
    pub transport: &'a T,
}

// ── Outputs ───────────────────────────────────────────────────────────────────

/// What the cleanup step did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CleanupOutcome {
    Stopped { id: String },
    AlreadyGone { id: String },
    Skipped { reason: String },
    Failed { id: String, error: String },
}

/// Final report of a scenario run. Always produced, whatever happened.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub scenario: String,
    pub deployment_name: String,
    pub deployment_id: Option<String>,
    /// Every state the run passed through, starting at `Idle`.
    pub states: Vec<FlowState>,
    pub connection: Option<ConnectionAttempt>,
    #[serde(serialize_with = "serialize_failure")]
    pub error: Option<FlowError>,
    /// State in which the fatal error occurred.
    pub failed_stage: Option<FlowState>,
    pub cleanup: CleanupOutcome,
}

impl RunReport {
    #[must_use]
    pub fn connected(&self) -> bool {
        self.connection
            .as_ref()
            .is_some_and(|c| c.outcome.is_connected())
    }

    #[must_use]
    pub fn final_state(&self) -> FlowState {
        self.states.last().copied().unwrap_or(FlowState::Idle)
    }

    /// No fatal error and cleanup did not fail. A refused or timed-out
    /// connection still counts as success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none() && !matches!(self.cleanup, CleanupOutcome::Failed { .. })
    }

    #[must_use]
    pub fn status_line(&self) -> String {
        format!("connected: {}", self.connected())
    }
}

fn serialize_failure<S: Serializer>(error: &Option<FlowError>, s: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Failure<'a> {
        code: &'a str,
        message: String,
    }
    error
        .as_ref()
        .map(|e| Failure {
            code: e.code(),
            message: e.to_string(),
        })
        .serialize(s)
}

// ── Flow bookkeeping ──────────────────────────────────────────────────────────

struct FlowRecorder<'a> {
    label: &'a str,
    states: RefCell<Vec<FlowState>>,
}

impl<'a> FlowRecorder<'a> {
    fn new(label: &'a str) -> Self {
        Self {
            label,
            states: RefCell::new(vec![FlowState::Idle]),
        }
    }

    fn current(&self) -> FlowState {
        self.states
            .borrow()
            .last()
            .copied()
            .unwrap_or(FlowState::Idle)
    }

    fn advance(&self, event: FlowEvent) {
        let from = self.current();
        match from.next(event) {
            Some(to) => {
                tracing::info!(scenario = self.label, %from, %to, "flow transition");
                self.states.borrow_mut().push(to);
            }
            None => {
                tracing::error!(scenario = self.label, %from, ?event, "ignoring invalid transition");
            }
        }
    }

    fn into_states(self) -> Vec<FlowState> {
        self.states.into_inner()
    }
}

/// State in which the run failed: the last one before cleanup.
fn failed_stage(states: &[FlowState]) -> Option<FlowState> {
    states
        .iter()
        .rev()
        .copied()
        .find(|s| !matches!(s, FlowState::CleaningUp | FlowState::Done))
}

// ── Guaranteed release ────────────────────────────────────────────────────────

/// A created deployment that must be released through [`Self::release`].
///
/// The id and project are captured at creation time; later lookups never
/// replace them. Only the observed status is updated, because the stop
/// policy depends on it.
struct ProvisionedResource {
    resource: ResourceDescriptor,
    status: Cell<ResourceStatus>,
    released: bool,
}

impl ProvisionedResource {
    fn acquire(resource: ResourceDescriptor) -> Self {
        let status = Cell::new(resource.status);
        Self {
            resource,
            status,
            released: false,
        }
    }

    fn resource(&self) -> &ResourceDescriptor {
        &self.resource
    }

    fn observe(&self, status: ResourceStatus) {
        self.status.set(status);
    }

    async fn release<D: DeploymentService>(
        mut self,
        provisioner: &ResourceProvisioner<'_, D>,
        policy: StopPolicy,
    ) -> CleanupOutcome {
        self.released = true;
        let id = self.resource.id.clone();
        match provisioner
            .stop(&self.resource, self.status.get(), policy)
            .await
        {
            Ok(StopOutcome::Stopped) => CleanupOutcome::Stopped { id },
            Ok(StopOutcome::AlreadyGone) => CleanupOutcome::AlreadyGone { id },
            Ok(StopOutcome::Skipped(status)) => CleanupOutcome::Skipped {
                reason: format!("deployment status is {status}"),
            },
            Err(e) => {
                tracing::error!(%id, error = %e, "failed to stop deployment");
                CleanupOutcome::Failed {
                    id,
                    error: e.to_string(),
                }
            }
        }
    }
}

impl Drop for ProvisionedResource {
    fn drop(&mut self) {
        if !self.released {
            tracing::warn!(
                id = %self.resource.id,
                name = %self.resource.name,
                "deployment dropped without cleanup; it may still be running"
            );
        }
    }
}

// ── Workflow ──────────────────────────────────────────────────────────────────

/// Run one scenario to completion.
///
/// Creates the deployment, waits for it, locates it, issues both tokens and
/// attempts a connection. Once the deployment exists it is always handed to
/// cleanup, whether the later steps succeed, fail or are cancelled through
/// `cancel`. Cleanup itself is not cancellable.
pub async fn run_scenario<D, I, L, T>(
    platform: &Platform<'_, D, I, L, T>,
    plan: &ScenarioPlan,
    reporter: &impl ProgressReporter,
    mut cancel: CancelSignal,
) -> RunReport
where
    D: DeploymentService,
    I: PlayerIdentityTokenService,
    L: LoginTokenService,
    T: LocatorTransport,
{
    let flow = FlowRecorder::new(&plan.label);
    let provisioner = ResourceProvisioner::new(platform.deployments, plan.poll);

    flow.advance(FlowEvent::Start);
    reporter.step(&format!("starting deployment {}", plan.create.name));

    // Not raced against `cancel`: a create the service accepted has to come
    // back with its id so cleanup can stop it. The request timeout bounds it.
    let resource = match provisioner.submit(&plan.create).await {
        Ok(resource) => resource,
        Err(error) => {
            flow.advance(FlowEvent::ProvisioningAborted);
            reporter.warn(&format!("deployment was not created: {error}"));
            flow.advance(FlowEvent::CleanupFinished);
            return finish(
                plan,
                None,
                flow,
                Err(error),
                CleanupOutcome::Skipped {
                    reason: "no deployment was created".to_string(),
                },
            );
        }
    };

    let deployment_id = resource.id.clone();
    let guard = ProvisionedResource::acquire(resource);

    let result = if cancel.is_cancelled() {
        flow.advance(FlowEvent::Cancelled);
        Err(FlowError::Cancelled {
            stage: FlowState::Provisioning,
        })
    } else {
        tokio::select! {
            r = provisioned_steps(platform, &provisioner, plan, reporter, &guard, &flow) => r,
            () = cancel.cancelled() => {
                let stage = flow.current();
                flow.advance(FlowEvent::Cancelled);
                Err(FlowError::Cancelled { stage })
            }
        }
    };

    match &result {
        Ok(attempt) if attempt.outcome.is_connected() => reporter.success("connected"),
        Ok(attempt) => reporter.warn(&format!("not connected: {}", attempt.outcome)),
        Err(error) => reporter.warn(&format!("{} failed: {error}", plan.label)),
    }

    reporter.step("stopping deployment");
    let cleanup = guard.release(&provisioner, plan.stop).await;
    match &cleanup {
        CleanupOutcome::Stopped { .. } | CleanupOutcome::AlreadyGone { .. } => {
            reporter.success("deployment stopped");
        }
        CleanupOutcome::Skipped { reason } => reporter.step(&format!("not stopping: {reason}")),
        CleanupOutcome::Failed { error, .. } => {
            reporter.warn(&format!("failed to stop deployment: {error}"));
        }
    }
    flow.advance(FlowEvent::CleanupFinished);

    finish(plan, Some(deployment_id), flow, result, cleanup)
}

/// Steps that run while the deployment is held. Each failure moves the flow
/// into `CleaningUp` before returning.
async fn provisioned_steps<D, I, L, T>(
    platform: &Platform<'_, D, I, L, T>,
    provisioner: &ResourceProvisioner<'_, D>,
    plan: &ScenarioPlan,
    reporter: &impl ProgressReporter,
    guard: &ProvisionedResource,
    flow: &FlowRecorder<'_>,
) -> Result<ConnectionAttempt, FlowError>
where
    D: DeploymentService,
    I: PlayerIdentityTokenService,
    L: LoginTokenService,
    T: LocatorTransport,
{
    reporter.step("waiting for deployment to start");
    let ready = match provisioner.await_ready(guard.resource()).await {
        Ok(ready) => ready,
        Err(error) => {
            if let Some(status) = observed_status(&error) {
                guard.observe(status);
            }
            flow.advance(FlowEvent::ProvisioningAborted);
            return Err(error);
        }
    };
    guard.observe(ready.status);
    flow.advance(FlowEvent::ResourceRunning);
    reporter.success(&format!("deployment {} running", ready.name));

    reporter.step("choosing deployment");
    let key = plan.lookup.key_for(&ready);
    let located = locator::find_by_id_or_name(provisioner, &plan.create.project_name, &key)
        .await
        .inspect_err(|_| flow.advance(FlowEvent::NotFound))?;
    flow.advance(FlowEvent::Found);

    reporter.step("generating player identity token");
    let identity = credentials::issue_identity_token(platform.identity, &plan.identity)
        .await
        .inspect_err(|_| flow.advance(FlowEvent::IssuanceFailed))?;

    reporter.step("generating login token for the selected deployment");
    let session = credentials::issue_session_token(
        platform.login,
        &SessionRequest {
            identity: &identity,
            deployment_id: &located.id,
            lifetime: plan.session_ttl,
            worker_type: &plan.parameters.worker_type,
        },
    )
    .await
    .inspect_err(|_| flow.advance(FlowEvent::IssuanceFailed))?;
    flow.advance(FlowEvent::TokensIssued);

    reporter.step("connecting with the login token and player identity token");
    let credentials = PlayerCredentials { identity, session };
    let attempt = connection::connect(
        platform.transport,
        &plan.endpoint,
        &credentials,
        &plan.parameters,
        plan.connect_timeout,
    )
    .await;
    flow.advance(FlowEvent::ConnectionFinished);
    Ok(attempt)
}

fn observed_status(error: &FlowError) -> Option<ResourceStatus> {
    match error {
        FlowError::ProvisioningFailed { .. } => Some(ResourceStatus::Error),
        FlowError::ProvisioningHalted { status, .. } => Some(*status),
        FlowError::ProvisioningTimeout { last_status, .. } => Some(*last_status),
        _ => None,
    }
}

fn finish(
    plan: &ScenarioPlan,
    deployment_id: Option<String>,
    flow: FlowRecorder<'_>,
    result: Result<ConnectionAttempt, FlowError>,
    cleanup: CleanupOutcome,
) -> RunReport {
    let states = flow.into_states();
    let (connection, error) = match result {
        Ok(attempt) => (Some(attempt), None),
        Err(error) => (None, Some(error)),
    };
    let failed_stage = error.as_ref().and_then(|_| failed_stage(&states));
    RunReport {
        scenario: plan.label.clone(),
        deployment_name: plan.create.name.clone(),
        deployment_id,
        states,
        connection,
        error,
        failed_stage,
        cleanup,
    }
}
