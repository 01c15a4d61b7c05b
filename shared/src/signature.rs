//! SharedKey request signing.
//!
//! Every ingestion request carries an `Authorization` header of the form:
//!
//! ```text
//! SharedKey <WorkspaceId>:<Signature>
//! ```
//!
//! Where `Signature = Base64(HMAC-SHA256(Base64Decode(SharedKey), StringToSign))` and:
//!
//! ```text
//! StringToSign = Method + "\n" +
//!                Content-Length + "\n" +
//!                Content-Type + "\n" +
//!                "x-ms-date:" + Date + "\n" +
//!                Resource
//! ```

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::config::{CONTENT_TYPE, METHOD, RESOURCE};

type HmacSha256 = Hmac<Sha256>;

/// `strftime` pattern for the RFC 1123 dates carried in `x-ms-date`.
pub const RFC1123_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Errors that can occur while signing a request.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The shared key is not valid base64.
    #[error("Shared key is not valid base64: {0}")]
    InvalidKey(#[from] base64::DecodeError),
}

/// Request metadata covered by the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureInput<'a> {
    /// RFC 1123 date, identical to the `x-ms-date` header.
    pub date: &'a str,
    /// Body length in bytes.
    pub content_length: usize,
    /// HTTP method.
    pub method: &'a str,
    /// Body content type.
    pub content_type: &'a str,
    /// Request path without query string.
    pub resource: &'a str,
}

impl<'a> SignatureInput<'a> {
    /// Metadata for a standard `POST /api/logs` JSON ingestion request.
    #[must_use]
    pub fn ingestion(date: &'a str, content_length: usize) -> Self {
        Self {
            date,
            content_length,
            method: METHOD,
            content_type: CONTENT_TYPE,
            resource: RESOURCE,
        }
    }

    /// The exact text that is MACed.
    #[must_use]
    pub fn string_to_sign(&self) -> String {
        string_to_sign(
            self.date,
            self.content_length,
            self.method,
            self.content_type,
            self.resource,
        )
    }

    /// Signs this metadata for `workspace_id` with the base64 `key`.
    ///
    /// # Errors
    ///
    /// Returns `SignatureError::InvalidKey` if `key` is not valid base64.
    pub fn sign(&self, workspace_id: &str, key: &str) -> Result<String, SignatureError> {
        build_signature(
            workspace_id,
            key,
            self.date,
            self.content_length,
            self.method,
            self.content_type,
            self.resource,
        )
    }
}

/// Formats a timestamp the way `x-ms-date` expects.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use shared::signature::rfc1123_date;
///
/// let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(rfc1123_date(ts), "Mon, 01 Jan 2024 00:00:00 GMT");
/// ```
#[must_use]
pub fn rfc1123_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format(RFC1123_FORMAT).to_string()
}

/// Builds the string to sign.
#[must_use]
pub fn string_to_sign(
    date: &str,
    content_length: usize,
    method: &str,
    content_type: &str,
    resource: &str,
) -> String {
    format!("{method}\n{content_length}\n{content_type}\nx-ms-date:{date}\n{resource}")
}

/// Computes the `Authorization` header value for one request.
///
/// Deterministic: the same inputs always give the same header.
///
/// # Errors
///
/// Returns `SignatureError::InvalidKey` if `key` is not valid base64.
///
/// # Example
///
/// ```
/// use shared::signature::build_signature;
///
/// let auth = build_signature(
///     "ws",
///     "dGVzdGtleQ==",
///     "Mon, 01 Jan 2024 00:00:00 GMT",
///     7,
///     "POST",
///     "application/json",
///     "/api/logs",
/// )
/// .unwrap();
/// assert_eq!(auth, "SharedKey ws:81SeRLCEpXIIqaXmsjH/9W4GYprKCTQHbl0fGTIJqi0=");
/// ```
pub fn build_signature(
    workspace_id: &str,
    key: &str,
    date: &str,
    content_length: usize,
    method: &str,
    content_type: &str,
    resource: &str,
) -> Result<String, SignatureError> {
    let decoded_key = BASE64.decode(key)?;
    let to_sign = string_to_sign(date, content_length, method, content_type, resource);

    let mut mac =
        HmacSha256::new_from_slice(&decoded_key).expect("HMAC can accept keys of any length");
    mac.update(to_sign.as_bytes());
    let encoded_hash = BASE64.encode(mac.finalize().into_bytes());

    Ok(format!("SharedKey {workspace_id}:{encoded_hash}"))
}
