//! Locator endpoint and connection outcome types.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use authflow_common::ConnectionParameters;

/// Default deadline for a single connection attempt, in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

/// Where the locator for a scenario lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocatorEndpoint {
    pub host: String,
    pub port: u16,
    /// Use a plaintext channel (local API service only).
    pub insecure: bool,
}

impl LocatorEndpoint {
    #[must_use]
    pub fn scheme(&self) -> &'static str {
        if self.insecure { "http" } else { "https" }
    }
}

/// Result of one bounded connection attempt. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConnectionOutcome {
    Connected,
    TimedOut { after_ms: u64 },
    Refused { reason: String },
}

impl ConnectionOutcome {
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for ConnectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => f.write_str("connected"),
            Self::TimedOut { after_ms } => write!(f, "timed out after {after_ms} ms"),
            Self::Refused { reason } => write!(f, "refused ({reason})"),
        }
    }
}

/// A finished connection attempt.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionAttempt {
    pub parameters: ConnectionParameters,
    #[serde(rename = "deadline_ms", serialize_with = "as_millis")]
    pub deadline: Duration,
    #[serde(flatten)]
    pub outcome: ConnectionOutcome,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's serialize_with signature
fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
