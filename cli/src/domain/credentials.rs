//! Player identity and login token types.
//!
//! Token values never appear in `Debug` output; use [`IdentityToken::expose`]
//! when the raw value has to go over the wire.

use std::fmt;
use std::time::Duration;

use crate::domain::error::FlowError;

/// Default lifetime requested for player identity tokens.
pub const DEFAULT_IDENTITY_TTL: Duration = Duration::from_secs(60 * 60);

/// Default lifetime requested for login tokens.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

macro_rules! opaque_token {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Raw token value.
            #[must_use]
            pub fn expose(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "(***)"))
            }
        }
    };
}

opaque_token!(
    /// Short-lived credential asserting a player's identity to the platform.
    IdentityToken
);

opaque_token!(
    /// Login token binding an identity token to one deployment.
    SessionToken
);

/// Both tokens a worker presents to the locator.
#[derive(Debug, Clone)]
pub struct PlayerCredentials {
    pub identity: IdentityToken,
    pub session: SessionToken,
}

/// Request for a player identity token.
#[derive(Debug, Clone)]
pub struct IdentityRequest {
    pub provider: String,
    pub player_identifier: String,
    pub project_name: String,
    pub lifetime: Duration,
    pub metadata: Option<String>,
}

impl IdentityRequest {
    /// Reject descriptors the remote service would refuse anyway.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidIdentity`] if the provider or player
    /// identifier is blank, or the lifetime is zero.
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.provider.trim().is_empty() {
            return Err(FlowError::InvalidIdentity("provider is empty".into()));
        }
        if self.player_identifier.trim().is_empty() {
            return Err(FlowError::InvalidIdentity("player identifier is empty".into()));
        }
        if self.lifetime.is_zero() {
            return Err(FlowError::InvalidIdentity("token lifetime must be positive".into()));
        }
        Ok(())
    }
}

/// Request for a login token scoped to one deployment.
#[derive(Debug, Clone)]
pub struct SessionRequest<'a> {
    pub identity: &'a IdentityToken,
    pub deployment_id: &'a str,
    pub lifetime: Duration,
    pub worker_type: &'a str,
}
