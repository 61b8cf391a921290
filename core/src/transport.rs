//! Executes plain-data HTTP requests against the network.
//!
//! # Design
//! `Transport` is the I/O half of the host-does-IO split: it takes an
//! `HttpRequest` built by `ResourceClient` and returns the raw
//! `HttpResponse`. Non-2xx statuses are data, not errors; only failures to
//! obtain any response at all become `ApiError::Transport`. Implementations
//! are blocking and are driven from `HttpApi` on tokio's blocking pool.

use std::time::Duration;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Blocking executor for `HttpRequest` values.
pub trait Transport: Clone + Send + Sync + 'static {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `Transport` backed by a shared `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        // Status codes are interpreted by `ResourceClient`, not by ureq.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Some(Duration::from_secs(30)))
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = request.method.as_str(), path = %request.path, "sending request");

        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => self.agent.get(&request.path).call(),
            (HttpMethod::Delete, _) => self.agent.delete(&request.path).call(),
            (HttpMethod::Post, Some(body)) => self
                .agent
                .post(&request.path)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Post, None) => self.agent.post(&request.path).send_empty(),
            (HttpMethod::Put, Some(body)) => self
                .agent
                .put(&request.path)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Put, None) => self.agent.put(&request.path).send_empty(),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        tracing::debug!(status, path = %request.path, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
