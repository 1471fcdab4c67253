//! Domain types and validators for authflow configuration.
//!
//! Pure functions only: no I/O or filesystem access.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use authflow_common::{ConnectionParameters, TransportKind};

use crate::domain::connection::DEFAULT_CONNECT_TIMEOUT_MS;
use crate::domain::credentials::{DEFAULT_IDENTITY_TTL, DEFAULT_SESSION_TTL};
use crate::domain::error::ConfigError;
use crate::domain::resource::{PollPolicy, StopPolicy};

/// Placeholder used when no refresh token is configured.
pub const REFRESH_TOKEN_PLACEHOLDER: &str = "PLEASE_REPLACE_ME";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.authflow/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Project that owns the deployments.
    pub project_name: String,
    /// Path to the launch configuration JSON.
    pub launch_config_path: String,
    /// Assembly the deployment runs.
    pub assembly_id: String,
    /// Deployment names are `{name_prefix}_{random suffix}`.
    pub name_prefix: String,
    pub identity: IdentityConfig,
    pub session: SessionConfig,
    pub connection: ConnectionConfig,
    pub provisioning: ProvisioningConfig,
    pub cloud: CloudConfig,
    pub local: LocalConfig,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            project_name: "platform_sdk_examples".to_string(),
            launch_config_path: "../../blank_project/default_launch.json".to_string(),
            assembly_id: "blank_project".to_string(),
            name_prefix: "byoauth_flow".to_string(),
            identity: IdentityConfig::default(),
            session: SessionConfig::default(),
            connection: ConnectionConfig::default(),
            provisioning: ProvisioningConfig::default(),
            cloud: CloudConfig::default(),
            local: LocalConfig::default(),
        }
    }
}

/// Player identity token settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub provider: String,
    pub player_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    pub ttl_minutes: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            provider: "provider".to_string(),
            player_identifier: "player_identifier".to_string(),
            metadata: None,
            ttl_minutes: DEFAULT_IDENTITY_TTL.as_secs() / 60,
        }
    }
}

/// Login token settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub ttl_minutes: u64,
    pub worker_type: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_SESSION_TTL.as_secs() / 60,
            worker_type: "UnityClient".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub timeout_ms: u64,
    pub transport: TransportKind,
    pub use_external_ip: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            transport: TransportKind::Tcp,
            use_external_ip: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
    /// Stop deployments that ended in `Error` during cleanup.
    pub stop_on_error: bool,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        let poll = PollPolicy::default();
        Self {
            poll_interval_ms: u64::try_from(poll.interval.as_millis()).unwrap_or(u64::MAX),
            max_poll_attempts: poll.max_attempts,
            stop_on_error: false,
        }
    }
}

/// Hosted platform endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub api_url: String,
    pub locator_host: String,
    pub locator_port: u16,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            api_url: "https://platform.improbable.io".to_string(),
            locator_host: "locator.improbable.io".to_string(),
            locator_port: 443,
        }
    }
}

/// Local API service endpoints. Always plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub host: String,
    pub port: u16,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9876,
        }
    }
}

impl FlowConfig {
    #[must_use]
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.provisioning.poll_interval_ms),
            max_attempts: self.provisioning.max_poll_attempts,
        }
    }

    #[must_use]
    pub fn stop_policy(&self) -> StopPolicy {
        StopPolicy {
            stop_on_error: self.provisioning.stop_on_error,
        }
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connection.timeout_ms)
    }

    #[must_use]
    pub fn identity_ttl(&self) -> Duration {
        Duration::from_secs(self.identity.ttl_minutes * 60)
    }

    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session.ttl_minutes * 60)
    }

    #[must_use]
    pub fn connection_parameters(&self) -> ConnectionParameters {
        ConnectionParameters {
            worker_type: self.session.worker_type.clone(),
            transport: self.connection.transport,
            use_external_ip: self.connection.use_external_ip,
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a loaded configuration before any remote call is made.
///
/// # Errors
///
/// Returns the first [`ConfigError`] found.
pub fn validate_config(config: &FlowConfig) -> Result<(), ConfigError> {
    let required = [
        ("project_name", &config.project_name),
        ("launch_config_path", &config.launch_config_path),
        ("assembly_id", &config.assembly_id),
        ("name_prefix", &config.name_prefix),
        ("session.worker_type", &config.session.worker_type),
    ];
    for (key, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::Missing { key });
        }
    }

    if !config
        .name_prefix
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(ConfigError::InvalidValue {
            key: "name_prefix",
            value: config.name_prefix.clone(),
            reason: "Deployment names may only contain lowercase letters, digits and '_'.",
        });
    }

    let positive = [
        ("provisioning.poll_interval_ms", config.provisioning.poll_interval_ms),
        ("provisioning.max_poll_attempts", u64::from(config.provisioning.max_poll_attempts)),
        ("connection.timeout_ms", config.connection.timeout_ms),
        ("identity.ttl_minutes", config.identity.ttl_minutes),
        ("session.ttl_minutes", config.session.ttl_minutes),
    ];
    for (key, value) in positive {
        if value == 0 {
            return Err(ConfigError::InvalidValue {
                key,
                value: value.to_string(),
                reason: "Must be greater than zero.",
            });
        }
    }

    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
