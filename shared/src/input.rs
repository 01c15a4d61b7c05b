//! JSON input loading.
//!
//! Reads a whole JSON document from a file or standard input, checks that it
//! parses, and produces the compact serialization that becomes the request
//! body. Nothing is sent anywhere until loading has succeeded.

use serde_json::Value;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Where the JSON document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A file on disk.
    File(PathBuf),
    /// Everything readable from standard input.
    Stdin,
}

impl InputSource {
    /// Picks a file source when a path is given, standard input otherwise.
    #[must_use]
    pub fn from_optional_path(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdin, Self::File)
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => write!(f, "<stdin>"),
        }
    }
}

/// Errors that can occur while loading the input document.
#[derive(Debug, Error)]
pub enum InputError {
    /// The source could not be read.
    #[error("Failed to read {source_name}: {error}")]
    Io {
        /// Display name of the source.
        source_name: String,
        /// Underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// The content is not valid JSON.
    #[error("Input should be valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A parsed JSON document and its canonical request body.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    value: Value,
    body: String,
}

impl Payload {
    /// Parses JSON read from `reader` until end of input.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if reading fails and `InputError::Malformed`
    /// if the content does not parse.
    pub fn from_reader(mut reader: impl Read, source_name: &str) -> Result<Self, InputError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|error| InputError::Io {
                source_name: source_name.to_string(),
                error,
            })?;
        text.parse()
    }

    /// Wraps an already parsed value.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let body = value.to_string();
        Self { value, body }
    }

    /// The parsed document.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The compact JSON text sent as the request body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Length of the body in bytes, as used for `Content-Length` and signing.
    #[must_use]
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Consumes the payload, returning the body text.
    #[must_use]
    pub fn into_body(self) -> String {
        self.body
    }
}

impl FromStr for Payload {
    type Err = InputError;

    /// Parses a JSON document held in memory.
    ///
    /// # Example
    ///
    /// ```
    /// use shared::input::Payload;
    ///
    /// let payload: Payload = "{ \"a\" : [1, 2] }".parse().unwrap();
    /// assert_eq!(payload.body(), r#"{"a":[1,2]}"#);
    /// ```
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(value))
    }
}

/// Loads and normalizes the JSON document from `source`.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened or read, or standard input fails
/// - The content is not valid JSON
pub fn load_payload(source: &InputSource) -> Result<Payload, InputError> {
    let source_name = source.to_string();
    let payload = match source {
        InputSource::File(path) => {
            let file = std::fs::File::open(path).map_err(|error| InputError::Io {
                source_name: source_name.clone(),
                error,
            })?;
            Payload::from_reader(file, &source_name)?
        }
        InputSource::Stdin => Payload::from_reader(std::io::stdin().lock(), &source_name)?,
    };

    tracing::debug!(
        source = %source_name,
        content_length = payload.content_length(),
        "Loaded JSON payload"
    );
    Ok(payload)
}
