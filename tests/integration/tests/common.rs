//! Common test fixtures.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use gk_core::{AuthResult, IndirectClient, OAuth10RequestToken, StaticValueGenerator};
use gk_oauth::{
    oauth20_client, BasicProfileDefinition, OAuth20Configuration, OAuthAccessToken, OAuthProvider,
};
use serde_json::{json, Value};

pub const CALLBACK_URL: &str = "https://app.example.com/callback";

/// Initializes tracing once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("gk_core=debug,gk_oauth=debug,gk_kerberos=debug,gk_saml=debug")
        .with_test_writer()
        .try_init();
}

/// An [`OAuthProvider`] that answers from canned data and counts its
/// round trips.
#[derive(Default)]
pub struct CountingProvider {
    pub code_exchanges: AtomicUsize,
    pub profile_fetches: AtomicUsize,
}

#[async_trait]
impl OAuthProvider for CountingProvider {
    async fn fetch_request_token(&self, _callback_url: &str) -> AuthResult<OAuth10RequestToken> {
        Ok(OAuth10RequestToken {
            token: "request-token".to_string(),
            secret: "request-secret".to_string(),
        })
    }

    async fn exchange_request_token(
        &self,
        _request_token: Option<&OAuth10RequestToken>,
        _token: &str,
        _verifier: &str,
    ) -> AuthResult<OAuthAccessToken> {
        Ok(OAuthAccessToken::new("access-token"))
    }

    async fn exchange_code(&self, code: &str, _callback_url: &str) -> AuthResult<OAuthAccessToken> {
        assert_eq!(code, "auth-code");
        self.code_exchanges.fetch_add(1, Ordering::SeqCst);
        Ok(OAuthAccessToken::new("access-token"))
    }

    async fn fetch_profile(&self, token: &OAuthAccessToken) -> AuthResult<Value> {
        assert_eq!(token.token, "access-token");
        self.profile_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(json!({
            "id": "jdoe",
            "displayName": "John Doe",
            "email": "jdoe@example.com",
        }))
    }
}

/// Builds an OAuth 2.0 client named `provider` with a fixed state value.
pub fn oauth20_test_client(provider: Arc<CountingProvider>) -> IndirectClient {
    let mut config = OAuth20Configuration::new(
        "app-id",
        "app-secret",
        "https://provider.example.com/authorize",
    );
    config.state_generator = Arc::new(StaticValueGenerator("fixed-state".to_string()));
    match oauth20_client(
        "provider",
        CALLBACK_URL,
        config,
        provider,
        Box::new(BasicProfileDefinition::default()),
    ) {
        Ok(client) => client,
        Err(e) => panic!("client assembly failed: {e}"),
    }
}
