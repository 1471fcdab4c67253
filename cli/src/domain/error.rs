//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

use crate::domain::flow::FlowState;
use authflow_common::{ResourceKey, ResourceStatus};

// ── Remote service errors ─────────────────────────────────────────────────────

/// Failure reported by one of the remote platform services.
///
/// Adapters classify every transport or protocol failure into one of these
/// three buckets; application services map them onto [`FlowError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("rejected: {0}")]
    Rejected(String),

    #[error("unavailable: {0}")]
    Unavailable(String),
}

// ── Workflow errors ───────────────────────────────────────────────────────────

/// Workflow-fatal errors. Every variant aborts the remaining steps and is
/// reported only after cleanup has been attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error(
        "Failed to start deployment '{name}' ({id}).\n\
         Make sure the project has been built (e.g. `spatial build`) and the assembly uploaded."
    )]
    ProvisioningFailed { name: String, id: String },

    #[error("Deployment '{name}' ({id}) went {status} while starting.")]
    ProvisioningHalted {
        name: String,
        id: String,
        status: ResourceStatus,
    },

    #[error(
        "Deployment '{name}' did not become ready after {attempts} status checks (last status: {last_status})."
    )]
    ProvisioningTimeout {
        name: String,
        attempts: u32,
        last_status: ResourceStatus,
    },

    #[error("No deployment with {key} in project '{project}'.")]
    ResourceNotFound { project: String, key: ResourceKey },

    #[error("Invalid player identity: {0}")]
    InvalidIdentity(String),

    #[error("Player identity token service unavailable: {0}")]
    AuthServiceUnavailable(String),

    #[error("Cannot issue a login token for unknown deployment '{0}'.")]
    UnknownResource(String),

    #[error("Login token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Cancelled while {stage}.")]
    Cancelled { stage: FlowState },

    #[error("Deployment service error during {operation}: {source}")]
    Service {
        operation: &'static str,
        source: ServiceError,
    },
}

impl FlowError {
    /// Stable machine-readable code used by `--json` output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProvisioningFailed { .. } => "provisioning_failed",
            Self::ProvisioningHalted { .. } => "provisioning_halted",
            Self::ProvisioningTimeout { .. } => "provisioning_timeout",
            Self::ResourceNotFound { .. } => "resource_not_found",
            Self::InvalidIdentity(_) => "invalid_identity",
            Self::AuthServiceUnavailable(_) => "auth_service_unavailable",
            Self::UnknownResource(_) => "unknown_resource",
            Self::TokenExchangeFailed(_) => "token_exchange_failed",
            Self::Cancelled { .. } => "cancelled",
            Self::Service { .. } => "service_error",
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {key}")]
    Missing { key: &'static str },

    #[error("Invalid value for {key}: {value}\n\n{reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}
