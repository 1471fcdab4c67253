//! Shared fake platform for unit tests.
//!
//! Provides in-memory implementations of every remote port so each test file
//! doesn't have to re-define the same boilerplate. Calls are recorded in
//! order so tests can assert on the exact sequence.

#![allow(clippy::expect_used, dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use authflow_cli::application::ports::{
    DeploymentService, LocatorTransport, LoginTokenService, PlayerIdentityTokenService,
    ProgressReporter,
};
use authflow_cli::application::services::orchestrator::{LookupBy, Platform, ScenarioPlan};
use authflow_cli::domain::{
    ConnectionParameters, CreateRequest, IdentityRequest, IdentityToken, LocatorEndpoint,
    PlayerCredentials, PollPolicy, ResourceDescriptor, ResourceStatus, ServiceError,
    SessionRequest, SessionToken, StopPolicy,
};

pub const PROJECT: &str = "platform_sdk_examples";

// ── Recorded calls ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(String),
    Get(String),
    List,
    Stop(String),
    Identity(String),
    Login { identity: String, deployment_id: String },
}

// ── Fake platform (deployments + both token services) ─────────────────────────

/// Deployment and token services backed by memory.
///
/// `get_deployment` answers with the queued statuses in order; the last one
/// repeats forever.
pub struct FakePlatform {
    statuses: Mutex<VecDeque<ResourceStatus>>,
    created: Mutex<Vec<ResourceDescriptor>>,
    calls: Mutex<Vec<Call>>,
    /// Returned by `list_deployments` instead of the created deployments.
    pub listing: Option<Vec<ResourceDescriptor>>,
    pub fail_create: Option<ServiceError>,
    pub fail_list: Option<ServiceError>,
    pub fail_identity: Option<ServiceError>,
    pub fail_login: Option<ServiceError>,
    pub fail_stop: Option<ServiceError>,
    /// How long the service takes to answer a create it has already accepted.
    pub create_delay: Option<Duration>,
}

impl FakePlatform {
    pub fn new(statuses: &[ResourceStatus]) -> Self {
        Self {
            statuses: Mutex::new(statuses.iter().copied().collect()),
            created: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            listing: None,
            fail_create: None,
            fail_list: None,
            fail_identity: None,
            fail_login: None,
            fail_stop: None,
            create_delay: None,
        }
    }

    /// Deployment that reports `Starting`, `Starting`, then `Running`.
    pub fn starts_after_two_polls() -> Self {
        Self::new(&[
            ResourceStatus::Starting,
            ResourceStatus::Starting,
            ResourceStatus::Running,
        ])
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn stop_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Stop(_)))
            .count()
    }

    pub fn get_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Get(_)))
            .count()
    }

    pub fn token_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Identity(_) | Call::Login { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn next_status(&self) -> ResourceStatus {
        let mut queue = self.statuses.lock().expect("status lock");
        if queue.len() > 1 {
            queue.pop_front().unwrap_or(ResourceStatus::Starting)
        } else {
            queue.front().copied().unwrap_or(ResourceStatus::Starting)
        }
    }
}

impl DeploymentService for FakePlatform {
    async fn create_deployment(
        &self,
        request: &CreateRequest,
    ) -> Result<ResourceDescriptor, ServiceError> {
        self.record(Call::Create(request.name.clone()));
        if let Some(e) = &self.fail_create {
            return Err(e.clone());
        }
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        let mut created = self.created.lock().expect("created lock");
        let resource = ResourceDescriptor {
            id: format!("{}", 100 + created.len()),
            name: request.name.clone(),
            project_name: request.project_name.clone(),
            launch_config: request.launch_config.clone(),
            assembly_id: request.assembly_id.clone(),
            status: ResourceStatus::Starting,
            created_at: None,
        };
        created.push(resource.clone());
        Ok(resource)
    }

    async fn get_deployment(
        &self,
        _project_name: &str,
        id: &str,
    ) -> Result<ResourceDescriptor, ServiceError> {
        self.record(Call::Get(id.to_string()));
        let found = self
            .created
            .lock()
            .expect("created lock")
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        Ok(found.with_status(self.next_status()))
    }

    async fn list_deployments(
        &self,
        _project_name: &str,
    ) -> Result<Vec<ResourceDescriptor>, ServiceError> {
        self.record(Call::List);
        if let Some(e) = &self.fail_list {
            return Err(e.clone());
        }
        if let Some(listing) = &self.listing {
            return Ok(listing.clone());
        }
        Ok(self.created.lock().expect("created lock").clone())
    }

    async fn stop_deployment(&self, _project_name: &str, id: &str) -> Result<(), ServiceError> {
        self.record(Call::Stop(id.to_string()));
        match &self.fail_stop {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

impl PlayerIdentityTokenService for FakePlatform {
    async fn create_player_identity_token(
        &self,
        request: &IdentityRequest,
    ) -> Result<IdentityToken, ServiceError> {
        self.record(Call::Identity(request.player_identifier.clone()));
        if let Some(e) = &self.fail_identity {
            return Err(e.clone());
        }
        Ok(IdentityToken::new(format!("pit-{}", request.player_identifier)))
    }
}

impl LoginTokenService for FakePlatform {
    async fn create_login_token(
        &self,
        request: &SessionRequest<'_>,
    ) -> Result<SessionToken, ServiceError> {
        self.record(Call::Login {
            identity: request.identity.expose().to_string(),
            deployment_id: request.deployment_id.to_string(),
        });
        if let Some(e) = &self.fail_login {
            return Err(e.clone());
        }
        Ok(SessionToken::new(format!(
            "login-{}-{}",
            request.identity.expose(),
            request.deployment_id
        )))
    }
}

// ── Fake locator transport ────────────────────────────────────────────────────

pub enum TransportBehavior {
    Answer(bool),
    Fail(ServiceError),
    Hang,
}

/// Locator that answers with a fixed behavior and records presented tokens.
///
/// A verifying locator also checks the token binding used by
/// [`FakePlatform`]: the login token must read `login-{identity}-{id}` for the
/// presented identity token and one of the running deployment ids.
pub struct FakeTransport {
    behavior: TransportBehavior,
    running: Option<Vec<String>>,
    seen: Mutex<Vec<(String, String)>>,
}

impl FakeTransport {
    pub fn new(behavior: TransportBehavior) -> Self {
        Self {
            behavior,
            running: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn connecting() -> Self {
        Self::new(TransportBehavior::Answer(true))
    }

    /// Connects only with a login token bound to the presented identity and
    /// to one of `running`.
    pub fn verifying(running: &[&str]) -> Self {
        Self {
            running: Some(running.iter().map(ToString::to_string).collect()),
            ..Self::connecting()
        }
    }

    /// `(identity, session)` pairs presented so far.
    pub fn seen(&self) -> Vec<(String, String)> {
        self.seen.lock().expect("seen lock").clone()
    }
}

impl LocatorTransport for FakeTransport {
    async fn connect(
        &self,
        _endpoint: &LocatorEndpoint,
        credentials: &PlayerCredentials,
        _parameters: &ConnectionParameters,
    ) -> Result<bool, ServiceError> {
        let identity = credentials.identity.expose();
        let session = credentials.session.expose();
        self.seen
            .lock()
            .expect("seen lock")
            .push((identity.to_string(), session.to_string()));
        if let Some(running) = &self.running {
            let bound = running
                .iter()
                .any(|id| session == format!("login-{identity}-{id}"));
            if !bound {
                return Err(ServiceError::Rejected(
                    "login token is not valid for this player and deployment".into(),
                ));
            }
        }
        match &self.behavior {
            TransportBehavior::Answer(connected) => Ok(*connected),
            TransportBehavior::Fail(e) => Err(e.clone()),
            TransportBehavior::Hang => std::future::pending().await,
        }
    }
}

// ── Recording reporter ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lines lock").clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.lines.lock().expect("lines lock").push(format!("→ {message}"));
    }
    fn success(&self, message: &str) {
        self.lines.lock().expect("lines lock").push(format!("✓ {message}"));
    }
    fn warn(&self, message: &str) {
        self.lines.lock().expect("lines lock").push(format!("! {message}"));
    }
}

// ── Builders ──────────────────────────────────────────────────────────────────

pub fn platform<'a>(
    fake: &'a FakePlatform,
    transport: &'a FakeTransport,
) -> Platform<'a, FakePlatform, FakePlatform, FakePlatform, FakeTransport> {
    Platform {
        deployments: fake,
        identity: fake,
        login: fake,
        transport,
    }
}

pub fn poll() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_secs(2),
        max_attempts: 10,
    }
}

pub fn plan(name: &str) -> ScenarioPlan {
    ScenarioPlan {
        label: "local".to_string(),
        create: CreateRequest {
            project_name: PROJECT.to_string(),
            name: name.to_string(),
            launch_config: "{}".to_string(),
            assembly_id: "blank_project".to_string(),
        },
        identity: IdentityRequest {
            provider: "provider".to_string(),
            player_identifier: "player_identifier".to_string(),
            project_name: PROJECT.to_string(),
            lifetime: Duration::from_secs(60 * 60),
            metadata: None,
        },
        session_ttl: Duration::from_secs(30 * 60),
        endpoint: LocatorEndpoint {
            host: "localhost".to_string(),
            port: 9876,
            insecure: true,
        },
        parameters: ConnectionParameters::default(),
        connect_timeout: Duration::from_millis(5000),
        poll: poll(),
        stop: StopPolicy::default(),
        lookup: LookupBy::Id,
    }
}

pub fn descriptor(id: &str, name: &str, status: ResourceStatus) -> ResourceDescriptor {
    ResourceDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        project_name: PROJECT.to_string(),
        launch_config: String::new(),
        assembly_id: "blank_project".to_string(),
        status,
        created_at: None,
    }
}
