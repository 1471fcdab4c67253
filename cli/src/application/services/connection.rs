//! Bounded connection attempt through the locator.

use std::time::Duration;

use crate::application::ports::LocatorTransport;
use crate::domain::{
    ConnectionAttempt, ConnectionOutcome, ConnectionParameters, LocatorEndpoint, PlayerCredentials,
};

/// Make one connection attempt that gives up after `timeout`.
///
/// Never fails: a timeout or refusal is reported in the returned
/// [`ConnectionAttempt`].
pub async fn connect(
    transport: &impl LocatorTransport,
    endpoint: &LocatorEndpoint,
    credentials: &PlayerCredentials,
    parameters: &ConnectionParameters,
    timeout: Duration,
) -> ConnectionAttempt {
    let outcome = match tokio::time::timeout(
        timeout,
        transport.connect(endpoint, credentials, parameters),
    )
    .await
    {
        Ok(Ok(true)) => ConnectionOutcome::Connected,
        Ok(Ok(false)) => ConnectionOutcome::Refused {
            reason: "locator returned no connection".to_string(),
        },
        Ok(Err(e)) => ConnectionOutcome::Refused {
            reason: e.to_string(),
        },
        Err(_) => ConnectionOutcome::TimedOut {
            after_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        },
    };
    tracing::info!(
        host = %endpoint.host,
        port = endpoint.port,
        outcome = ?outcome,
        "connection attempt finished"
    );

    ConnectionAttempt {
        parameters: parameters.clone(),
        deadline: timeout,
        outcome,
    }
}
