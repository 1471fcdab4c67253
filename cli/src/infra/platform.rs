//! HTTP client for the platform's deployment and player-auth APIs.
//!
//! Implements `DeploymentService`, `PlayerIdentityTokenService` and
//! `LoginTokenService` over JSON. The same client serves the hosted platform
//! (bearer refresh token) and the local API service (no credentials).

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::ports::{DeploymentService, LoginTokenService, PlayerIdentityTokenService};
use crate::domain::{
    CreateRequest, IdentityRequest, IdentityToken, ResourceDescriptor, ResourceStatus,
    ServiceError, SessionRequest, SessionToken,
};

/// Per-request timeout for platform API calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Platform API client.
#[derive(Clone)]
pub struct PlatformClient {
    http: Client,
    base_url: String,
    refresh_token: Option<String>,
}

impl PlatformClient {
    /// Client for `base_url`, e.g. `https://platform.improbable.io` or
    /// `http://localhost:9876`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(base_url: impl Into<String>, refresh_token: Option<String>) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(DEFAULT_REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            refresh_token,
        })
    }

    fn deployments_url(&self, project_name: &str) -> String {
        format!(
            "{}/deployment/v1alpha1/projects/{project_name}/deployments",
            self.base_url
        )
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.refresh_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ServiceError> {
        let response = self.authed(builder).send().await.map_err(transport_error)?;
        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Unavailable(format!("invalid response body: {e}")))
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct LaunchConfigDto {
    config_json: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct DeploymentDto {
    #[serde(default)]
    id: String,
    name: String,
    project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    launch_config: Option<LaunchConfigDto>,
    #[serde(default)]
    assembly_id: String,
    #[serde(default = "starting")]
    status: ResourceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_time: Option<DateTime<Utc>>,
}

fn starting() -> ResourceStatus {
    ResourceStatus::Starting
}

impl From<DeploymentDto> for ResourceDescriptor {
    fn from(dto: DeploymentDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            project_name: dto.project_name,
            launch_config: dto.launch_config.map(|c| c.config_json).unwrap_or_default(),
            assembly_id: dto.assembly_id,
            status: dto.status,
            created_at: dto.start_time,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListDeploymentsResponse {
    #[serde(default)]
    deployments: Vec<DeploymentDto>,
}

#[derive(Debug, Serialize)]
struct CreatePlayerIdentityTokenBody<'a> {
    provider: &'a str,
    player_identifier: &'a str,
    project_name: &'a str,
    lifetime_duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreatePlayerIdentityTokenResponse {
    player_identity_token: String,
}

#[derive(Debug, Serialize)]
struct CreateLoginTokenBody<'a> {
    player_identity_token: &'a str,
    deployment_id: &'a str,
    lifetime_duration: String,
    worker_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateLoginTokenResponse {
    login_token: String,
}

/// Protobuf-JSON duration encoding, e.g. `1800s`.
fn duration_string(d: Duration) -> String {
    format!("{}s", d.as_secs())
}

// ── Error mapping ─────────────────────────────────────────────────────────────

fn transport_error(e: reqwest::Error) -> ServiceError {
    ServiceError::Unavailable(e.to_string())
}

/// Map an HTTP status and body onto a [`ServiceError`].
#[must_use]
pub fn classify_status(status: StatusCode, body: &str) -> ServiceError {
    let detail = if body.trim().is_empty() {
        status.to_string()
    } else {
        format!("{status}: {}", body.trim())
    };
    match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound(detail),
        StatusCode::BAD_REQUEST
        | StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::CONFLICT
        | StatusCode::UNPROCESSABLE_ENTITY => ServiceError::Rejected(detail),
        _ => ServiceError::Unavailable(detail),
    }
}

async fn check_status(response: Response) -> Result<Response, ServiceError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(classify_status(status, &body))
}

// ── Port implementations ──────────────────────────────────────────────────────

impl DeploymentService for PlatformClient {
    async fn create_deployment(
        &self,
        request: &CreateRequest,
    ) -> Result<ResourceDescriptor, ServiceError> {
        let body = DeploymentDto {
            id: String::new(),
            name: request.name.clone(),
            project_name: request.project_name.clone(),
            launch_config: Some(LaunchConfigDto {
                config_json: request.launch_config.clone(),
            }),
            assembly_id: request.assembly_id.clone(),
            status: ResourceStatus::Starting,
            start_time: None,
        };
        let dto: DeploymentDto = self
            .send(
                self.http
                    .post(self.deployments_url(&request.project_name))
                    .json(&body),
            )
            .await?;
        Ok(dto.into())
    }

    async fn get_deployment(
        &self,
        project_name: &str,
        id: &str,
    ) -> Result<ResourceDescriptor, ServiceError> {
        let url = format!("{}/{id}", self.deployments_url(project_name));
        let dto: DeploymentDto = self.send(self.http.get(url)).await?;
        Ok(dto.into())
    }

    async fn list_deployments(
        &self,
        project_name: &str,
    ) -> Result<Vec<ResourceDescriptor>, ServiceError> {
        let list: ListDeploymentsResponse = self
            .send(self.http.get(self.deployments_url(project_name)))
            .await?;
        Ok(list.deployments.into_iter().map(Into::into).collect())
    }

    async fn stop_deployment(&self, project_name: &str, id: &str) -> Result<(), ServiceError> {
        let url = format!("{}/{id}:stop", self.deployments_url(project_name));
        // The stop response body carries nothing we use and may be empty.
        let response = self
            .authed(self.http.post(url))
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await?;
        Ok(())
    }
}

impl PlayerIdentityTokenService for PlatformClient {
    async fn create_player_identity_token(
        &self,
        request: &IdentityRequest,
    ) -> Result<IdentityToken, ServiceError> {
        let url = format!(
            "{}/playerauth/v2alpha1/projects/{}/playeridentitytokens",
            self.base_url, request.project_name
        );
        let body = CreatePlayerIdentityTokenBody {
            provider: &request.provider,
            player_identifier: &request.player_identifier,
            project_name: &request.project_name,
            lifetime_duration: duration_string(request.lifetime),
            metadata: request.metadata.as_deref(),
        };
        let response: CreatePlayerIdentityTokenResponse =
            self.send(self.http.post(url).json(&body)).await?;
        Ok(IdentityToken::new(response.player_identity_token))
    }
}

impl LoginTokenService for PlatformClient {
    async fn create_login_token(
        &self,
        request: &SessionRequest<'_>,
    ) -> Result<SessionToken, ServiceError> {
        let url = format!("{}/playerauth/v2alpha1/logintokens", self.base_url);
        let body = CreateLoginTokenBody {
            player_identity_token: request.identity.expose(),
            deployment_id: request.deployment_id,
            lifetime_duration: duration_string(request.lifetime),
            worker_type: request.worker_type,
        };
        let response: CreateLoginTokenResponse =
            self.send(self.http.post(url).json(&body)).await?;
        Ok(SessionToken::new(response.login_token))
    }
}
