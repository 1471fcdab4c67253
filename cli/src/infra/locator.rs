//! Locator connection over HTTP: implements `LocatorTransport`.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::LocatorTransport;
use crate::domain::{ConnectionParameters, LocatorEndpoint, PlayerCredentials, ServiceError};
use crate::infra::platform::classify_status;

/// Single-shot worker connection through a locator's HTTP front door.
///
/// No request timeout is configured here: the connection step bounds the
/// whole attempt.
#[derive(Clone, Default)]
pub struct HttpLocatorTransport {
    http: Client,
}

impl HttpLocatorTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Serialize)]
struct ConnectBody<'a> {
    player_identity_token: &'a str,
    login_token: &'a str,
    worker_type: &'a str,
    transport: &'a str,
    use_external_ip: bool,
}

#[derive(Debug, Deserialize)]
struct ConnectResponse {
    #[serde(default)]
    connected: bool,
}

/// `{scheme}://{host}:{port}/v1/locator/connect`
#[must_use]
pub fn connect_url(endpoint: &LocatorEndpoint) -> String {
    format!(
        "{}://{}:{}/v1/locator/connect",
        endpoint.scheme(),
        endpoint.host,
        endpoint.port
    )
}

impl LocatorTransport for HttpLocatorTransport {
    async fn connect(
        &self,
        endpoint: &LocatorEndpoint,
        credentials: &PlayerCredentials,
        parameters: &ConnectionParameters,
    ) -> Result<bool, ServiceError> {
        let body = ConnectBody {
            player_identity_token: credentials.identity.expose(),
            login_token: credentials.session.expose(),
            worker_type: &parameters.worker_type,
            transport: parameters.transport.as_str(),
            use_external_ip: parameters.use_external_ip,
        };
        let url = connect_url(endpoint);
        tracing::debug!(%url, worker_type = %parameters.worker_type, "connecting through locator");

        let res = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Unavailable(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(classify_status(status, &text));
        }
        let answer: ConnectResponse = res
            .json()
            .await
            .map_err(|e| ServiceError::Unavailable(format!("invalid locator response: {e}")))?;
        Ok(answer.connected)
    }
}
