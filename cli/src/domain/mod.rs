//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod connection;
pub mod credentials;
pub mod error;
pub mod flow;
pub mod resource;

pub use authflow_common::{
    ConnectionParameters, ResourceDescriptor, ResourceKey, ResourceStatus, TransportKind,
};
pub use config::{FlowConfig, validate_config};
pub use connection::{ConnectionAttempt, ConnectionOutcome, LocatorEndpoint};
pub use credentials::{IdentityRequest, IdentityToken, PlayerCredentials, SessionRequest, SessionToken};
pub use error::{ConfigError, FlowError, ServiceError};
pub use flow::{FlowEvent, FlowState};
pub use resource::{CreateRequest, PollPolicy, StopPolicy, select_resource};
