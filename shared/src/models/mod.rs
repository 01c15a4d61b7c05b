//! Data models for la-ingest.
//!
//! This module contains the credentials that identify and authorize a
//! Log Analytics workspace.

pub mod credentials;

pub use credentials::{Credentials, CredentialsError, MAX_LOG_TYPE_LEN};
