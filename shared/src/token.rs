//! Client-credentials token fetcher.
//!
//! Obtains an OAuth access token from an Azure AD style identity endpoint.
//! The ingestion flow signs with the shared key and does not use this; it is
//! kept as a standalone helper for callers that need a bearer token.

use serde::Deserialize;
use thiserror::Error;

/// Public Azure identity authority.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Errors that can occur while fetching a token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The request failed in transit or the body could not be decoded.
    #[error("Token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The identity endpoint answered with a non-2xx status.
    #[error("Token endpoint returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response did not contain an access token.
    #[error("Token response has no access_token")]
    MissingToken,
}

/// Parameters of a client-credentials grant.
#[derive(Debug, Clone)]
pub struct TokenRequest {
    /// Identity authority base URL, e.g. [`DEFAULT_AUTHORITY`].
    pub authority: String,
    /// Resource (audience) the token is requested for.
    pub resource: String,
    /// Directory (tenant) id.
    pub tenant_id: String,
    /// Application (client) id.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
}

impl TokenRequest {
    /// Creates a request against [`DEFAULT_AUTHORITY`].
    #[must_use]
    pub fn new(
        resource: impl Into<String>,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            authority: DEFAULT_AUTHORITY.to_string(),
            resource: resource.into(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Uses a different identity authority.
    #[must_use]
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    /// The token endpoint URL.
    ///
    /// # Example
    ///
    /// ```
    /// use shared::token::TokenRequest;
    ///
    /// let req = TokenRequest::new("https://api.loganalytics.io", "tenant", "client", "secret");
    /// assert_eq!(
    ///     req.token_url(),
    ///     "https://login.microsoftonline.com/tenant/oauth2/token"
    /// );
    /// ```
    #[must_use]
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/token",
            self.authority.trim_end_matches('/'),
            self.tenant_id
        )
    }

    fn form(&self) -> [(&'static str, &str); 4] {
        [
            ("grant_type", "client_credentials"),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("resource", &self.resource),
        ]
    }
}

/// An issued access token.
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    /// Bearer token value.
    pub access_token: String,

    /// Token type reported by the endpoint, usually `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
}

/// Fetches access tokens over HTTP.
#[derive(Debug, Clone, Default)]
pub struct TokenClient {
    client: reqwest::Client,
}

impl TokenClient {
    /// Creates a token client with a default HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a token client on top of an existing HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Runs a client-credentials grant.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request fails or the response is not JSON
    /// - The endpoint answers with a non-2xx status
    /// - The response has no `access_token`
    pub async fn fetch_token(&self, request: &TokenRequest) -> Result<AccessToken, TokenError> {
        let url = request.token_url();
        tracing::debug!(%url, client_id = %request.client_id, "Requesting access token");

        let response = self.client.post(&url).form(&request.form()).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Token request rejected");
            return Err(TokenError::Status {
                status: status.as_u16(),
            });
        }

        let body: TokenResponse = response.json().await?;
        let access_token = body.access_token.ok_or(TokenError::MissingToken)?;

        Ok(AccessToken {
            access_token,
            token_type: body.token_type,
        })
    }
}
