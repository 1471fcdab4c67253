//! Resolve a [`ScenarioPlan`] from configuration.

use std::fmt;

use serde::Serialize;

use crate::application::services::orchestrator::{LookupBy, ScenarioPlan};
use crate::domain::{CreateRequest, FlowConfig, IdentityRequest, LocatorEndpoint};

/// Where a scenario's deployment runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Hosted platform, TLS locator, bearer refresh token.
    Cloud,
    /// Local API service, plaintext locator, no credentials.
    Local,
}

impl Scenario {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Cloud => "cloud",
            Self::Local => "local",
        }
    }

    /// Base URL of the deployment and player-auth APIs.
    #[must_use]
    pub fn api_url(self, config: &FlowConfig) -> String {
        match self {
            Self::Cloud => config.cloud.api_url.clone(),
            Self::Local => format!("http://{}:{}", config.local.host, config.local.port),
        }
    }

    #[must_use]
    pub fn locator(self, config: &FlowConfig) -> LocatorEndpoint {
        match self {
            Self::Cloud => LocatorEndpoint {
                host: config.cloud.locator_host.clone(),
                port: config.cloud.locator_port,
                insecure: false,
            },
            Self::Local => LocatorEndpoint {
                host: config.local.host.clone(),
                port: config.local.port,
                insecure: true,
            },
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Build the plan for one scenario.
///
/// `launch_config` is the launch configuration text and `deployment_name`
/// the freshly generated unique name.
#[must_use]
pub fn scenario_plan(
    config: &FlowConfig,
    scenario: Scenario,
    launch_config: &str,
    deployment_name: String,
    lookup: LookupBy,
) -> ScenarioPlan {
    ScenarioPlan {
        label: scenario.label().to_string(),
        create: CreateRequest {
            project_name: config.project_name.clone(),
            name: deployment_name,
            launch_config: launch_config.to_string(),
            assembly_id: config.assembly_id.clone(),
        },
        identity: IdentityRequest {
            provider: config.identity.provider.clone(),
            player_identifier: config.identity.player_identifier.clone(),
            project_name: config.project_name.clone(),
            lifetime: config.identity_ttl(),
            metadata: config.identity.metadata.clone(),
        },
        session_ttl: config.session_ttl(),
        endpoint: scenario.locator(config),
        parameters: config.connection_parameters(),
        connect_timeout: config.connect_timeout(),
        poll: config.poll_policy(),
        stop: config.stop_policy(),
        lookup,
    }
}
