//! Caching decorator inside a full client pipeline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use gk_core::{
    AuthResult, CachingAuthenticator, Credentials, CredentialsKind, IndirectClient,
    InMemorySessionStore, MockWebContext, RedirectAction, RedirectionActionBuilder, SessionStore,
    WebContext,
};
use gk_kerberos::{KerberosExtractor, KerberosAuthenticator, TicketValidator, ValidatedTicket};

use crate::common::init_tracing;

struct LoginPageRedirect;

#[async_trait]
impl RedirectionActionBuilder for LoginPageRedirect {
    async fn redirection_action(
        &self,
        _context: &dyn WebContext,
        _session: &dyn SessionStore,
        _callback_url: &str,
    ) -> AuthResult<RedirectAction> {
        Ok(RedirectAction::SeeOther(
            "https://app.example.com/login".to_string(),
        ))
    }
}

struct CountingValidator {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TicketValidator for CountingValidator {
    async fn validate_ticket(&self, _ticket: &[u8]) -> AuthResult<ValidatedTicket> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ValidatedTicket {
            principal: "jdoe@EXAMPLE.COM".to_string(),
        })
    }
}

fn spnego_client(cache: Arc<CachingAuthenticator>) -> IndirectClient {
    match IndirectClient::builder("spnego", "https://app.example.com/callback")
        .redirection(Box::new(LoginPageRedirect))
        .extractor(Box::new(KerberosExtractor))
        .authenticator(cache)
        .build()
    {
        Ok(client) => client,
        Err(e) => panic!("client assembly failed: {e}"),
    }
}

fn ticket_context() -> MockWebContext {
    let encoded = base64::engine::general_purpose::STANDARD.encode(b"ap-req");
    MockWebContext::new().with_header("Authorization", format!("Negotiate {encoded}"))
}

#[tokio::test]
async fn repeated_callbacks_hit_the_validator_once() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = Arc::new(CachingAuthenticator::new(
        Arc::new(KerberosAuthenticator::new(Arc::new(CountingValidator {
            calls: Arc::clone(&calls),
        }))),
        16,
        Duration::from_secs(60),
    ));
    let client = spnego_client(Arc::clone(&cache));
    let store = InMemorySessionStore::new();

    for _ in 0..3 {
        let profile = client
            .callback(&ticket_context(), &store)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.id, "jdoe@EXAMPLE.COM");
        assert_eq!(profile.client_name.as_deref(), Some("spnego"));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(cache.is_cached(&Credentials::new(CredentialsKind::Kerberos {
        ticket: b"ap-req".to_vec(),
    })));
}

#[tokio::test]
async fn eviction_forces_a_fresh_validation() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = Arc::new(CachingAuthenticator::new(
        Arc::new(KerberosAuthenticator::new(Arc::new(CountingValidator {
            calls: Arc::clone(&calls),
        }))),
        16,
        Duration::from_secs(60),
    ));
    let client = spnego_client(Arc::clone(&cache));
    let store = InMemorySessionStore::new();

    client.callback(&ticket_context(), &store).await.unwrap();
    cache.remove_from_cache(&Credentials::new(CredentialsKind::Kerberos {
        ticket: b"ap-req".to_vec(),
    }));
    client.callback(&ticket_context(), &store).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unauthenticated_request_redirects_to_login() {
    init_tracing();
    let cache = Arc::new(CachingAuthenticator::new(
        Arc::new(KerberosAuthenticator::new(Arc::new(CountingValidator {
            calls: Arc::new(AtomicUsize::new(0)),
        }))),
        16,
        Duration::from_secs(60),
    ));
    let client = spnego_client(cache);
    let store = InMemorySessionStore::new();

    let bare = MockWebContext::new();
    assert!(client.callback(&bare, &store).await.unwrap().is_none());

    let action = client.redirection_action(&bare, &store).await.unwrap();
    assert_eq!(action.status(), 303);
    assert_eq!(action.location(), "https://app.example.com/login");
}
