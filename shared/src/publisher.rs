//! Log Analytics publisher.
//!
//! Sends one signed JSON document to the HTTP Data Collector API and reports
//! the status the service answered with. There is no retry: a rejected or
//! failed request ends the run.

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::config::{EndpointError, IngestionEndpoint, CONTENT_TYPE as JSON_CONTENT_TYPE};
use crate::input::Payload;
use crate::models::Credentials;
use crate::signature::{rfc1123_date, SignatureError, SignatureInput};

/// Header naming the custom log table records land in.
pub const LOG_TYPE_HEADER: &str = "Log-Type";

/// Header carrying the signed request date.
pub const DATE_HEADER: &str = "x-ms-date";

/// Errors that can occur while publishing.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The ingestion URL could not be built.
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] EndpointError),

    /// The request could not be signed.
    #[error("Failed to sign request: {0}")]
    Signature(#[from] SignatureError),

    /// The HTTP client could not be built or the request failed in transit.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// How the service answered a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Any 2xx status.
    Accepted {
        /// HTTP status code.
        status: u16,
    },
    /// Any other status. Terminal for the run.
    Rejected {
        /// HTTP status code.
        status: u16,
    },
}

impl PublishOutcome {
    /// Classifies a response status.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        if (200..=299).contains(&status) {
            Self::Accepted { status }
        } else {
            Self::Rejected { status }
        }
    }

    /// Whether the document was accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// The HTTP status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Accepted { status } | Self::Rejected { status } => *status,
        }
    }
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted { .. } => write!(f, "Accepted"),
            Self::Rejected { status } => write!(f, "Response code: {status}"),
        }
    }
}

/// Publisher settings.
#[derive(Debug, Clone, Default)]
pub struct PublisherConfig {
    /// Where requests go.
    pub endpoint: IngestionEndpoint,

    /// Trace the HTTP exchange: connection-level I/O from the client plus
    /// the outgoing request line and headers.
    pub verbose: bool,

    /// Overall request timeout. `None` waits as long as the transport does.
    pub timeout: Option<Duration>,
}

impl PublisherConfig {
    /// Sets the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: IngestionEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Enables or disables HTTP tracing.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets a request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Signs and sends JSON documents to a workspace.
#[derive(Debug, Clone)]
pub struct Publisher {
    client: reqwest::Client,
    config: PublisherConfig,
}

impl Publisher {
    /// Creates a publisher with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::Transport` if the HTTP client cannot be built.
    pub fn new(config: PublisherConfig) -> Result<Self, PublishError> {
        let mut builder = reqwest::Client::builder().connection_verbose(config.verbose);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// The settings this publisher was built with.
    #[must_use]
    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    /// Builds the signed ingestion request without sending it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The endpoint cannot produce a URL
    /// - The shared key is not valid base64
    /// - A header value is not representable (e.g. a log type with control characters)
    pub fn build_request(
        &self,
        credentials: &Credentials,
        payload: &Payload,
        timestamp: DateTime<Utc>,
    ) -> Result<reqwest::Request, PublishError> {
        let url = self.config.endpoint.url_for(&credentials.workspace_id)?;
        let date = rfc1123_date(timestamp);
        let signature = SignatureInput::ingestion(&date, payload.content_length())
            .sign(&credentials.workspace_id, &credentials.shared_key)?;

        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
            .header(AUTHORIZATION, signature)
            .header(LOG_TYPE_HEADER, credentials.log_type.as_str())
            .header(DATE_HEADER, date)
            .body(payload.body().to_owned())
            .build()?;

        Ok(request)
    }

    /// Publishes `payload`, signing it with the current UTC time.
    ///
    /// # Errors
    ///
    /// See [`Publisher::publish_at`].
    pub async fn publish(
        &self,
        credentials: &Credentials,
        payload: &Payload,
    ) -> Result<PublishOutcome, PublishError> {
        self.publish_at(credentials, payload, Utc::now()).await
    }

    /// Publishes `payload` with an explicit request timestamp.
    ///
    /// A non-2xx answer is not an error; it comes back as
    /// [`PublishOutcome::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the transport fails.
    pub async fn publish_at(
        &self,
        credentials: &Credentials,
        payload: &Payload,
        timestamp: DateTime<Utc>,
    ) -> Result<PublishOutcome, PublishError> {
        let request = self.build_request(credentials, payload, timestamp)?;
        self.trace_request(&request);

        let response = self.client.execute(request).await?;
        let outcome = PublishOutcome::from_status(response.status().as_u16());

        if outcome.is_accepted() {
            tracing::info!(
                status = outcome.status(),
                log_type = %credentials.log_type,
                "Payload accepted"
            );
        } else {
            tracing::warn!(
                status = outcome.status(),
                log_type = %credentials.log_type,
                "Payload rejected"
            );
        }

        Ok(outcome)
    }

    fn trace_request(&self, request: &reqwest::Request) {
        if self.config.verbose {
            tracing::info!(
                method = %request.method(),
                url = %request.url(),
                headers = ?describe_headers(request.headers()),
                "Sending ingestion request"
            );
        } else {
            tracing::debug!(
                method = %request.method(),
                url = %request.url(),
                "Sending ingestion request"
            );
        }
    }
}

/// Renders headers as `name: value` lines with the signature redacted.
fn describe_headers(headers: &HeaderMap) -> Vec<String> {
    headers
        .iter()
        .map(|(name, value)| {
            if *name == AUTHORIZATION {
                format!("{name}: {}", redact_signature(value))
            } else {
                format!("{name}: {}", value.to_str().unwrap_or("<binary>"))
            }
        })
        .collect()
}

/// Keeps the `SharedKey <workspace>` prefix and hides the digest.
fn redact_signature(value: &HeaderValue) -> String {
    value
        .to_str()
        .ok()
        .and_then(|v| v.split_once(':'))
        .map_or_else(
            || "<redacted>".to_string(),
            |(prefix, _)| format!("{prefix}:<redacted>"),
        )
}
