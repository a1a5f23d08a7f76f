//! Blocking HTTP transport backed by `ureq`.

use super::{LimiterHandle, Params, Transport, TransportError};
use serde_json::Value;
use std::time::Duration;
use ureq::Agent;

const API_KEY_HEADER: &str = "X-Riot-Token";

/// `Transport` over HTTPS.
pub struct HttpTransport {
    agent: Agent,
    api_key: Option<String>,
}

impl HttpTransport {
    /// Creates a transport with a global request timeout.
    pub fn new(timeout: Duration, api_key: Option<String>) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent, api_key }
    }
}

impl Transport for HttpTransport {
    fn fetch(
        &self,
        url: &str,
        params: &Params,
        limiter: &LimiterHandle,
    ) -> Result<Value, TransportError> {
        let mut request = self.agent.get(url);
        for (key, value) in params {
            request = request.query(key.as_str(), value.as_str());
        }
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key.as_str());
        }

        limiter.acquire();
        tracing::debug!(url, ?params, "GET");

        match request.call() {
            Ok(mut response) => response
                .body_mut()
                .read_json::<Value>()
                .map_err(|e| TransportError::Decode(format!("{}: {}", url, e))),
            Err(ureq::Error::StatusCode(404)) => Err(TransportError::NotFound(format!(
                "Remote service returned 404 for {}",
                url
            ))),
            Err(ureq::Error::StatusCode(code)) => Err(TransportError::Status {
                code,
                url: url.to_string(),
            }),
            Err(e) => Err(TransportError::Io(e.to_string())),
        }
    }
}
