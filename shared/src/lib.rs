//! la-ingest Shared Library
//!
//! This crate contains the pieces used by the `la-ingest` CLI to send a JSON
//! document to the Azure Log Analytics HTTP Data Collector API.
//!
//! # Modules
//!
//! - [`input`] - Load and normalize the JSON document
//! - [`signature`] - SharedKey HMAC-SHA256 request signing
//! - [`publisher`] - Build and send the signed ingestion request
//! - [`models`] - Workspace credentials
//! - [`config`] - Wire constants and endpoint configuration
//! - `token` - Client-credentials token helper (feature `token`)
//!
//! # Example
//!
//! ```
//! use shared::input::Payload;
//! use shared::signature::SignatureInput;
//!
//! let payload: Payload = r#"{ "a": 1 }"#.parse().unwrap();
//! let auth = SignatureInput::ingestion("Mon, 01 Jan 2024 00:00:00 GMT", payload.content_length())
//!     .sign("ws", "dGVzdGtleQ==")
//!     .unwrap();
//!
//! assert_eq!(auth, "SharedKey ws:81SeRLCEpXIIqaXmsjH/9W4GYprKCTQHbl0fGTIJqi0=");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod input;
pub mod models;
pub mod publisher;
pub mod signature;
#[cfg(feature = "token")]
pub mod token;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde_json;
pub use validator;
