//! Deployment provisioning: create, poll until settled, list, stop.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use crate::application::ports::DeploymentService;
use crate::domain::{
    CreateRequest, FlowError, PollPolicy, ResourceDescriptor, ResourceStatus, ServiceError,
    StopPolicy,
};

/// Result of a cleanup stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The stop call was accepted.
    Stopped,
    /// The service no longer knows the deployment.
    AlreadyGone,
    /// The stop policy does not allow stopping from this status.
    Skipped(ResourceStatus),
}

/// Drives deployments through the remote service with a bounded poll loop.
pub struct ResourceProvisioner<'a, D> {
    service: &'a D,
    poll: PollPolicy,
}

impl<'a, D: DeploymentService> ResourceProvisioner<'a, D> {
    #[must_use]
    pub fn new(service: &'a D, poll: PollPolicy) -> Self {
        Self { service, poll }
    }

    /// Create a deployment and wait until it is `Running`.
    ///
    /// # Errors
    ///
    /// See [`Self::submit`] and [`Self::await_ready`].
    pub async fn create(&self, request: &CreateRequest) -> Result<ResourceDescriptor, FlowError> {
        let submitted = self.submit(request).await?;
        self.await_ready(&submitted).await
    }

    /// Send the create request without waiting for the deployment to start.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Service`] if the service refuses the request.
    pub async fn submit(&self, request: &CreateRequest) -> Result<ResourceDescriptor, FlowError> {
        let created = self
            .service
            .create_deployment(request)
            .await
            .map_err(|source| FlowError::Service {
                operation: "create deployment",
                source,
            })?;
        tracing::info!(
            project = %created.project_name,
            name = %created.name,
            id = %created.id,
            status = %created.status,
            "deployment submitted"
        );
        Ok(created)
    }

    /// Poll until the deployment is `Running` or `Error`, at most
    /// `max_attempts` times, sleeping `interval` between checks.
    ///
    /// # Errors
    ///
    /// - [`FlowError::ProvisioningFailed`] when the deployment ends in `Error`.
    /// - [`FlowError::ProvisioningHalted`] when it is stopping or stopped and
    ///   so can no longer start.
    /// - [`FlowError::ProvisioningTimeout`] when the ceiling is reached first.
    /// - [`FlowError::Service`] when a status check fails.
    pub async fn await_ready(
        &self,
        resource: &ResourceDescriptor,
    ) -> Result<ResourceDescriptor, FlowError> {
        let mut last_status = resource.status;

        for attempt in 1..=self.poll.max_attempts {
            let current = self
                .service
                .get_deployment(&resource.project_name, &resource.id)
                .await
                .map_err(|source| FlowError::Service {
                    operation: "get deployment",
                    source,
                })?;
            tracing::debug!(id = %resource.id, attempt, status = %current.status, "polled deployment");

            match current.status {
                ResourceStatus::Running => return Ok(current),
                ResourceStatus::Error => {
                    tracing::warn!(id = %resource.id, name = %resource.name, "deployment failed to start");
                    return Err(FlowError::ProvisioningFailed {
                        name: resource.name.clone(),
                        id: resource.id.clone(),
                    });
                }
                status @ (ResourceStatus::Stopping | ResourceStatus::Stopped) => {
                    tracing::warn!(id = %resource.id, %status, "deployment stopped while starting");
                    return Err(FlowError::ProvisioningHalted {
                        name: resource.name.clone(),
                        id: resource.id.clone(),
                        status,
                    });
                }
                ResourceStatus::Starting => last_status = ResourceStatus::Starting,
            }

            if attempt < self.poll.max_attempts {
                tokio::time::sleep(self.poll.interval).await;
            }
        }

        Err(FlowError::ProvisioningTimeout {
            name: resource.name.clone(),
            attempts: self.poll.max_attempts,
            last_status,
        })
    }

    /// All deployments in `project_name`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Service`] if the listing fails.
    pub async fn list(&self, project_name: &str) -> Result<Vec<ResourceDescriptor>, FlowError> {
        self.service
            .list_deployments(project_name)
            .await
            .map_err(|source| FlowError::Service {
                operation: "list deployments",
                source,
            })
    }

    /// Stop `resource` if `policy` allows it for `status`.
    ///
    /// A deployment the service no longer knows about counts as stopped, so
    /// calling this twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns the service error if the stop call itself fails.
    pub async fn stop(
        &self,
        resource: &ResourceDescriptor,
        status: ResourceStatus,
        policy: StopPolicy,
    ) -> Result<StopOutcome, ServiceError> {
        if !policy.permits(status) {
            tracing::info!(id = %resource.id, %status, "not stopping deployment");
            return Ok(StopOutcome::Skipped(status));
        }
        match self
            .service
            .stop_deployment(&resource.project_name, &resource.id)
            .await
        {
            Ok(()) => {
                tracing::info!(id = %resource.id, "deployment stopped");
                Ok(StopOutcome::Stopped)
            }
            Err(ServiceError::NotFound(_)) => Ok(StopOutcome::AlreadyGone),
            Err(e) => Err(e),
        }
    }
}
