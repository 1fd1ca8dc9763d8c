#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTTP collaborators for the traffic map.
//!
//! [`BackendClient`] talks to the backend's `/api` endpoints and
//! [`DirectionsClient`] to the mapping provider. Both retry transient
//! failures (see [`retry`]); nothing downstream of this crate sees a
//! transport error, only an absent summary or a provider status.

pub mod directions;
pub mod retry;

#[cfg(test)]
mod test_server;

use std::time::Duration;

use async_trait::async_trait;
use chapchap_config::{AppConfig, RemoteConfig};
use chapchap_incident_models::{IncidentCreate, IncidentReport};
use chapchap_route_models::{
    ProviderRequest, ProviderResponse, RouteHistoryEntry, RouteRequest, RouteSummary,
};
use chapchap_traffic_models::TrafficZone;
use serde::Deserialize;

pub use directions::{DirectionsClient, decode_polyline};
pub use retry::RetryPolicy;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("chapchap/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur talking to the backend or the mapping provider.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server answered with an error status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided detail, or a description of the failure.
        message: String,
    },
}

/// Source of backend route summaries.
#[async_trait]
pub trait RouteSummarySource: Send + Sync {
    /// Requests a summary for `request`.
    async fn route_summary(&self, request: &RouteRequest) -> Result<RouteSummary, ClientError>;
}

/// External mapping provider computing route geometry.
#[async_trait]
pub trait MappingProvider: Send + Sync {
    /// Requests directions. A non-`OK` status is a successful call.
    async fn directions(&self, request: &ProviderRequest)
    -> Result<ProviderResponse, ClientError>;
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

/// Client for the backend REST API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    api_base: String,
    policy: RetryPolicy,
}

impl BackendClient {
    /// Creates a client rooted at `api_base` (e.g. `http://host:8001/api`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(api_base: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            policy: RetryPolicy::DEFAULT,
        })
    }

    /// Creates a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(config.api_base())
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.api_base)
    }

    /// `GET /config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails after retries.
    pub async fn config(&self) -> Result<RemoteConfig, ClientError> {
        let url = self.url("config");
        retry::send_json(&self.policy, || self.client.get(&url)).await
    }

    /// `GET /traffic-zones`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails after retries.
    pub async fn traffic_zones(&self) -> Result<Vec<TrafficZone>, ClientError> {
        let url = self.url("traffic-zones");
        let zones: Vec<TrafficZone> =
            retry::send_json(&self.policy, || self.client.get(&url)).await?;
        log::debug!("Fetched {} traffic zones", zones.len());
        Ok(zones)
    }

    /// `GET /incidents`: active incidents, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails after retries.
    pub async fn incidents(&self) -> Result<Vec<IncidentReport>, ClientError> {
        let url = self.url("incidents");
        retry::send_json(&self.policy, || self.client.get(&url)).await
    }

    /// `POST /incidents`. Sent once; a duplicate report is worse than a
    /// failed one.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn report_incident(
        &self,
        incident: &IncidentCreate,
    ) -> Result<IncidentReport, ClientError> {
        let url = self.url("incidents");
        let report: IncidentReport =
            retry::send_json(&RetryPolicy::NONE, || self.client.post(&url).json(incident)).await?;
        log::info!("Reported {} incident {}", report.kind, report.id);
        Ok(report)
    }

    /// `PUT /incidents/{id}/resolve`. Returns the backend's message.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Status`] with status 404 if the incident does
    /// not exist.
    pub async fn resolve_incident(&self, id: &str) -> Result<String, ClientError> {
        let url = self.url(&format!("incidents/{id}/resolve"));
        let response: MessageResponse =
            retry::send_json(&self.policy, || self.client.put(&url)).await?;
        Ok(response.message)
    }

    /// `GET /route-history`: up to 20 routes, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails after retries.
    pub async fn route_history(&self) -> Result<Vec<RouteHistoryEntry>, ClientError> {
        let url = self.url("route-history");
        retry::send_json(&self.policy, || self.client.get(&url)).await
    }
}

#[async_trait]
impl RouteSummarySource for BackendClient {
    async fn route_summary(&self, request: &RouteRequest) -> Result<RouteSummary, ClientError> {
        let url = self.url("route");
        retry::send_json(&self.policy, || self.client.post(&url).json(request)).await
    }
}
