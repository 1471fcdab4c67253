//! Deployment lookup within a project.

use crate::application::ports::DeploymentService;
use crate::application::services::provisioner::ResourceProvisioner;
use crate::domain::{FlowError, ResourceDescriptor, ResourceKey, select_resource};

/// Find the first deployment in `project_name` matching `key`.
///
/// # Errors
///
/// - [`FlowError::ResourceNotFound`] when nothing matches.
/// - [`FlowError::Service`] when the listing fails.
pub async fn find_by_id_or_name<D: DeploymentService>(
    provisioner: &ResourceProvisioner<'_, D>,
    project_name: &str,
    key: &ResourceKey,
) -> Result<ResourceDescriptor, FlowError> {
    let deployments = provisioner.list(project_name).await?;

    let found = select_resource(&deployments, key)
        .cloned()
        .ok_or_else(|| FlowError::ResourceNotFound {
            project: project_name.to_string(),
            key: key.clone(),
        })?;
    tracing::debug!(%key, id = %found.id, listed = deployments.len(), "deployment located");
    Ok(found)
}
