//! OAuth client configuration.

use std::collections::BTreeMap;
use std::sync::Arc;

use gk_core::{RandomValueGenerator, ValueGenerator};

/// The OAuth 2.0 `code` callback parameter.
pub const OAUTH_CODE: &str = "code";

/// The OAuth 2.0 `state` parameter.
pub const STATE_PARAMETER: &str = "state";

/// The OAuth 1.0a `oauth_token` callback parameter.
pub const OAUTH_TOKEN: &str = "oauth_token";

/// The OAuth 1.0a `oauth_verifier` callback parameter.
pub const OAUTH_VERIFIER: &str = "oauth_verifier";

/// Configuration for an OAuth 2.0 client.
///
/// Key, secret, scope and URLs come from the embedding application's
/// configuration surface; this type only consumes already-resolved values.
pub struct OAuth20Configuration {
    /// The client identifier registered at the provider.
    pub key: String,
    /// The client secret.
    pub secret: String,
    /// The provider's authorization endpoint.
    pub auth_url: String,
    /// Requested scope, if any.
    pub scope: Option<String>,
    /// Whether to carry an anti-CSRF `state` value through the handshake.
    /// On by default; turning it off also disables verification.
    pub with_state: bool,
    /// Provider-specific extra authorization parameters, in stable order.
    pub custom_params: BTreeMap<String, String>,
    /// Generator for the `state` value.
    pub state_generator: Arc<dyn ValueGenerator>,
}

impl OAuth20Configuration {
    /// Creates a configuration with state handling enabled and a random
    /// state generator.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        secret: impl Into<String>,
        auth_url: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            auth_url: auth_url.into(),
            scope: None,
            with_state: true,
            custom_params: BTreeMap::new(),
            state_generator: Arc::new(RandomValueGenerator::default()),
        }
    }

    /// The session key under which the named client parks its `state`.
    #[must_use]
    pub fn state_session_key(&self, client_name: &str) -> String {
        format!("{client_name}.oauth20.state")
    }
}

/// Configuration for an OAuth 1.0a client.
pub struct OAuth10Configuration {
    /// The consumer key registered at the provider.
    pub key: String,
    /// The consumer secret.
    pub secret: String,
    /// The provider's authorization endpoint, which receives the request
    /// token.
    pub authorize_url: String,
}

impl OAuth10Configuration {
    /// Creates a configuration.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        secret: impl Into<String>,
        authorize_url: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            authorize_url: authorize_url.into(),
        }
    }

    /// The session key under which the named client parks its request
    /// token between the redirect and the callback.
    #[must_use]
    pub fn request_token_session_key(&self, client_name: &str) -> String {
        format!("{client_name}.oauth10.request_token")
    }
}
