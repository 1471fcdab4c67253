use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a remote deployment, as reported by the provisioning service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ResourceStatus {
    Starting,
    Running,
    Stopping,
    Stopped,
    Error,
}

impl ResourceStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "Starting",
            Self::Running => "Running",
            Self::Stopping => "Stopping",
            Self::Stopped => "Stopped",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deployment owned by a project.
///
/// `id` is empty until the provisioning service has accepted the create
/// request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceDescriptor {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub project_name: String,
    /// Launch configuration JSON, passed through untouched.
    #[serde(default)]
    pub launch_config: String,
    #[serde(default)]
    pub assembly_id: String,
    pub status: ResourceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ResourceDescriptor {
    /// Same descriptor with a new observed status.
    #[must_use]
    pub fn with_status(mut self, status: ResourceStatus) -> Self {
        self.status = status;
        self
    }
}

/// Lookup key used to locate a deployment among those listed for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "lowercase")]
pub enum ResourceKey {
    Id(String),
    Name(String),
}

impl ResourceKey {
    /// Exact match on the field this key tracks.
    #[must_use]
    pub fn matches(&self, resource: &ResourceDescriptor) -> bool {
        match self {
            Self::Id(id) => resource.id == *id,
            Self::Name(name) => resource.name == *name,
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id '{id}'"),
            Self::Name(name) => write!(f, "name '{name}'"),
        }
    }
}

/// Network transport used for the worker connection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Reliable, ordered stream.
    #[default]
    Tcp,
    Kcp,
}

impl TransportKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Kcp => "kcp",
        }
    }
}

/// Parameters describing how a worker connects once the locator admits it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionParameters {
    pub worker_type: String,
    pub transport: TransportKind,
    /// Prefer the resource's external address over its internal one.
    pub use_external_ip: bool,
}

impl Default for ConnectionParameters {
    fn default() -> Self {
        Self {
            worker_type: "UnityClient".to_string(),
            transport: TransportKind::Tcp,
            use_external_ip: true,
        }
    }
}
