use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the identity provider
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: token verification failed")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// A token the provider has verified, bound to the caller's email
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub email: String,
}

/// Client for the external identity provider
///
/// The provider is a black box that maps a bearer token to a verified email.
/// All authorization decisions in the server use the email returned here,
/// never a caller-supplied one.
pub struct IdentityClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl IdentityClient {
    /// Create a new identity client
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            client,
        }
    }

    /// Verify a bearer token and return the caller's verified email.
    ///
    /// Any provider-side rejection (expired, revoked, malformed token) maps
    /// to `Unauthorized`; transport and shape problems keep their own
    /// variants so the server can log them as provider failures.
    pub async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let url = format!(
            "{}/v1/accounts:lookup?key={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.api_key),
        );

        tracing::debug!("Verifying token against identity provider");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "idToken": token }))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(IdentityError::Unauthorized);
        }
        if !status.is_success() {
            return Err(IdentityError::ApiError(format!(
                "Token lookup failed: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        let email = json
            .get("users")
            .and_then(|u| u.as_array())
            .and_then(|u| u.first())
            .and_then(|u| u.get("email"))
            .and_then(|e| e.as_str())
            .ok_or_else(|| IdentityError::InvalidResponse("Missing verified email".into()))?;

        tracing::debug!("Token verified for {}", email);

        Ok(VerifiedIdentity {
            email: email.to_string(),
        })
    }
}
