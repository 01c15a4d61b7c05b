//! Configuration module for la-ingest.
//!
//! Holds the fixed wire constants of the HTTP Data Collector API, the
//! environment variable names the CLI falls back to, and the endpoint
//! description used by the publisher.

pub mod endpoint;

pub use endpoint::{EndpointError, IngestionEndpoint};

/// API version sent as the `api-version` query parameter.
pub const API_VERSION: &str = "2016-04-01";

/// Resource path of the ingestion API. Also part of the string to sign.
pub const RESOURCE: &str = "/api/logs";

/// HTTP method used for ingestion.
pub const METHOD: &str = "POST";

/// Content type of every ingestion request body.
pub const CONTENT_TYPE: &str = "application/json";

/// Ingestion host suffix for the public Azure cloud.
pub const DEFAULT_INGESTION_DOMAIN: &str = "ods.opinsights.azure.com";

/// Environment variable holding the workspace id.
pub const ENV_WORKSPACE_ID: &str = "LOG_ANALYTICS_WORKSPACE_ID";

/// Environment variable holding the log type.
pub const ENV_LOG_TYPE: &str = "AZURE_ANALYTICS_LOGTYPE";

/// Environment variable holding the base64 shared key.
pub const ENV_SHARED_KEY: &str = "AZURE_ANALYTICS_KEY";

/// Environment variable overriding the ingestion domain.
pub const ENV_INGESTION_DOMAIN: &str = "LOG_ANALYTICS_INGESTION_DOMAIN";

/// Environment variable overriding the full endpoint base URL.
pub const ENV_ENDPOINT: &str = "LOG_ANALYTICS_ENDPOINT";
