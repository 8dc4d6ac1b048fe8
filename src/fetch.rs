//! Loading the client list from the HTTP API.
//!
//! [`ClientFetcher::fetch`] reports every failure as an error.
//! [`load_clients`] never fails: it swaps in the built-in dataset and says so
//! through [`ClientSource`].

use std::time::Duration;

use tracing::{debug, warn};
use ureq::http::header::CONTENT_TYPE;
use ureq::Agent;

use crate::client::{fallback_clients, normalize_clients_payload, ClientRecord};
use crate::config::ApiSettings;
use crate::error::{Result, TrackerError};

/// How much of an error response body is kept for the error message.
const ERROR_BODY_PREVIEW: usize = 200;

/// One GET of the client list, bounded by a global timeout.
#[derive(Debug, Clone)]
pub struct ClientFetcher {
    url: String,
    timeout: Duration,
}

impl ClientFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    pub fn from_settings(api: &ApiSettings) -> Self {
        Self::new(api.url(), api.timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches and normalizes the client list.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::Timeout`] if the request doesn't finish in time
    /// - [`TrackerError::Http`] on other transport failures
    /// - [`TrackerError::HttpStatus`] on a non-2xx response
    /// - [`TrackerError::InvalidJson`] if the body isn't JSON
    /// - [`TrackerError::UnexpectedPayload`] if the JSON holds no record list
    pub fn fetch(&self) -> Result<Vec<ClientRecord>> {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .http_status_as_error(false)
            .build()
            .into();

        debug!(url = %self.url, timeout_ms = self.timeout_ms(), "fetching clients");
        let mut response = agent
            .get(self.url.as_str())
            .call()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.body_mut().read_to_string().unwrap_or_default();
            return Err(TrackerError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body: text.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !content_type.contains("json") {
            debug!(%content_type, "response is not labelled as JSON, parsing anyway");
        }

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| self.transport_error(e))?;
        let payload: serde_json::Value =
            serde_json::from_str(&body).map_err(TrackerError::InvalidJson)?;

        normalize_clients_payload(&payload)
    }

    fn transport_error(&self, err: ureq::Error) -> TrackerError {
        match err {
            ureq::Error::Timeout(_) => TrackerError::Timeout(self.timeout_ms()),
            other => TrackerError::Http(other),
        }
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Where a loaded client list came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientSource {
    Live,
    /// Built-in dataset, used because the live fetch failed.
    Fallback { reason: String },
}

#[derive(Debug, Clone)]
pub struct LoadedClients {
    pub clients: Vec<ClientRecord>,
    pub source: ClientSource,
}

impl LoadedClients {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ClientSource::Fallback { .. })
    }
}

/// Fetches the client list, substituting the fallback dataset on any error.
pub fn load_clients(fetcher: &ClientFetcher) -> LoadedClients {
    match fetcher.fetch() {
        Ok(clients) => LoadedClients {
            clients,
            source: ClientSource::Live,
        },
        Err(err) => {
            warn!(url = %fetcher.url(), error = %err, "client fetch failed, using built-in data");
            LoadedClients {
                clients: fallback_clients(),
                source: ClientSource::Fallback {
                    reason: err.to_string(),
                },
            }
        }
    }
}
