//! Ingestion endpoint configuration.
//!
//! The target URL is normally derived from the workspace id and the cloud's
//! ingestion domain. A base URL override exists for proxies and local test
//! servers; the resource path and API version are always appended.

use super::{API_VERSION, DEFAULT_INGESTION_DOMAIN, RESOURCE};
use thiserror::Error;

/// Errors raised when an endpoint description cannot produce a URL.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    /// The ingestion domain is empty.
    #[error("Ingestion domain cannot be empty")]
    EmptyDomain,

    /// The override base URL does not use http or https.
    #[error("Endpoint override must start with http:// or https://, got {0}")]
    UnsupportedScheme(String),
}

/// Where ingestion requests are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionEndpoint {
    /// Host suffix appended to the workspace id.
    pub domain: String,

    /// Optional base URL replacing `https://{workspace_id}.{domain}`.
    pub base_url: Option<String>,
}

impl IngestionEndpoint {
    /// Creates an endpoint for the given ingestion domain.
    ///
    /// # Examples
    ///
    /// ```
    /// use shared::config::IngestionEndpoint;
    ///
    /// let endpoint = IngestionEndpoint::new("ods.opinsights.azure.us");
    /// assert_eq!(endpoint.domain, "ods.opinsights.azure.us");
    /// assert!(endpoint.base_url.is_none());
    /// ```
    #[must_use]
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            base_url: None,
        }
    }

    /// Sends requests to `base_url` instead of the workspace host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Builds the full ingestion URL for a workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No override is set and the domain is empty
    /// - The override does not use an http(s) scheme
    ///
    /// # Examples
    ///
    /// ```
    /// use shared::config::IngestionEndpoint;
    ///
    /// let url = IngestionEndpoint::default().url_for("abc").unwrap();
    /// assert_eq!(
    ///     url,
    ///     "https://abc.ods.opinsights.azure.com/api/logs?api-version=2016-04-01"
    /// );
    /// ```
    pub fn url_for(&self, workspace_id: &str) -> Result<String, EndpointError> {
        let base = match &self.base_url {
            Some(base) => {
                if !(base.starts_with("http://") || base.starts_with("https://")) {
                    return Err(EndpointError::UnsupportedScheme(base.clone()));
                }
                base.trim_end_matches('/').to_string()
            }
            None => {
                if self.domain.is_empty() {
                    return Err(EndpointError::EmptyDomain);
                }
                format!("https://{workspace_id}.{}", self.domain)
            }
        };

        Ok(format!("{base}{RESOURCE}?api-version={API_VERSION}"))
    }
}

impl Default for IngestionEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_INGESTION_DOMAIN)
    }
}
