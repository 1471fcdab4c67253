//! Deployment lifecycle rules: polling limits, stop policy, lookup.

use std::time::Duration;

use authflow_common::{ResourceDescriptor, ResourceKey, ResourceStatus};

/// Parameters for a deployment create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub project_name: String,
    pub name: String,
    pub launch_config: String,
    pub assembly_id: String,
}

/// How often, and how many times, to check a starting deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    /// Two seconds between checks, give up after ten minutes.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 300,
        }
    }
}

/// Which observed statuses allow a Stop call during cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StopPolicy {
    /// Also stop deployments that ended in `Error`.
    pub stop_on_error: bool,
}

impl StopPolicy {
    #[must_use]
    pub fn permits(self, status: ResourceStatus) -> bool {
        match status {
            ResourceStatus::Running | ResourceStatus::Starting | ResourceStatus::Stopped => true,
            ResourceStatus::Error => self.stop_on_error,
            ResourceStatus::Stopping => false,
        }
    }
}

/// First resource matching `key`, in listing order.
#[must_use]
pub fn select_resource<'a>(
    resources: &'a [ResourceDescriptor],
    key: &ResourceKey,
) -> Option<&'a ResourceDescriptor> {
    resources.iter().find(|r| key.matches(r))
}
