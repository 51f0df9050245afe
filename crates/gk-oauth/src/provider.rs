//! Transport interface to the OAuth provider.
//!
//! The pipeline never performs HTTP itself; the token-endpoint round trips
//! live behind [`OAuthProvider`], implemented by the embedding application
//! over its HTTP client of choice. Failures should be reported through
//! [`gk_core::AuthError::Transport`] so the pipeline can distinguish wire
//! problems from rejected credentials.

use async_trait::async_trait;
use gk_core::{AuthResult, OAuth10RequestToken};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An access token obtained from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthAccessToken {
    /// The token value.
    pub token: String,
    /// The token secret (OAuth 1.0a only).
    pub secret: Option<String>,
}

impl OAuthAccessToken {
    /// Creates a bearer-style token without a secret.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: None,
        }
    }
}

/// Provider-side operations of the OAuth handshakes.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Obtains an OAuth 1.0a request token (first leg of the three-legged
    /// dance).
    async fn fetch_request_token(&self, callback_url: &str) -> AuthResult<OAuth10RequestToken>;

    /// Exchanges an OAuth 1.0a token and verifier for an access token.
    ///
    /// `request_token` is the token parked before the redirect, when still
    /// available.
    async fn exchange_request_token(
        &self,
        request_token: Option<&OAuth10RequestToken>,
        token: &str,
        verifier: &str,
    ) -> AuthResult<OAuthAccessToken>;

    /// Exchanges an OAuth 2.0 authorization code for an access token.
    async fn exchange_code(
        &self,
        code: &str,
        callback_url: &str,
    ) -> AuthResult<OAuthAccessToken>;

    /// Fetches the raw user profile for the given access token.
    async fn fetch_profile(&self, token: &OAuthAccessToken) -> AuthResult<Value>;
}
