//! Workspace credentials model.
//!
//! Defines the `Credentials` triple used to sign and label every ingestion
//! request.

use std::fmt;
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Longest log type accepted by the ingestion service.
pub const MAX_LOG_TYPE_LEN: usize = 100;

/// Credentials and labelling for a Log Analytics workspace.
///
/// The shared key is kept in its base64 text form; it is decoded only when a
/// request is signed. `Debug` output never shows it.
///
/// # Example
///
/// ```
/// use shared::models::Credentials;
///
/// let creds = Credentials::new("workspace-id", "dGVzdGtleQ==", "MyRecords");
/// assert!(creds.validate_credentials().is_ok());
/// assert!(!format!("{creds:?}").contains("dGVzdGtleQ=="));
/// ```
#[derive(Clone, Validate)]
pub struct Credentials {
    /// Workspace identifier; also the first label of the ingestion host.
    #[validate(length(min = 1, message = "Workspace id cannot be empty"))]
    pub workspace_id: String,

    /// Base64-encoded shared key.
    #[validate(length(min = 1, message = "Shared key cannot be empty"))]
    pub shared_key: String,

    /// Record type label sent in the `Log-Type` header.
    #[validate(
        length(min = 1, max = 100, message = "Log type must be 1 to 100 characters"),
        custom(function = "validate_log_type")
    )]
    pub log_type: String,
}

/// Errors that can occur during credentials validation.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// The workspace id is empty.
    #[error("Workspace id cannot be empty")]
    EmptyWorkspaceId,

    /// The log type is empty.
    #[error("Log type cannot be empty")]
    EmptyLogType,

    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

fn validate_log_type(log_type: &str) -> Result<(), ValidationError> {
    if log_type
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        Err(ValidationError::new("log_type_charset")
            .with_message("Log type may only contain letters, digits and underscores".into()))
    }
}

impl Credentials {
    /// Creates credentials from their three parts.
    #[must_use]
    pub fn new(
        workspace_id: impl Into<String>,
        shared_key: impl Into<String>,
        log_type: impl Into<String>,
    ) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            shared_key: shared_key.into(),
            log_type: log_type.into(),
        }
    }

    /// Validates the credentials.
    ///
    /// The shared key is only checked for presence here; whether it is valid
    /// base64 is discovered when a request is signed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The workspace id is empty
    /// - The log type is empty, longer than 100 characters, or contains
    ///   characters other than letters, digits and underscores
    /// - The shared key is empty
    pub fn validate_credentials(&self) -> Result<(), CredentialsError> {
        if self.workspace_id.is_empty() {
            return Err(CredentialsError::EmptyWorkspaceId);
        }
        if self.log_type.is_empty() {
            return Err(CredentialsError::EmptyLogType);
        }
        self.validate()?;
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("workspace_id", &self.workspace_id)
            .field("shared_key", &"<redacted>")
            .field("log_type", &self.log_type)
            .finish()
    }
}
