//! OAuth 2.0 redirect/callback round trip.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use gk_core::{
    AuthError, Authorizer, InMemorySessionStore, MockWebContext, RequireAnyRoleAuthorizer,
    SessionStore, WebContext,
};
use serde_json::json;

use crate::common::{init_tracing, oauth20_test_client, CountingProvider};

fn callback_context(session_id: &str) -> MockWebContext {
    MockWebContext::new()
        .with_session_id(session_id)
        .with_parameter("client_name", "provider")
        .with_parameter("code", "auth-code")
        .with_parameter("state", "fixed-state")
}

#[tokio::test]
async fn full_round_trip_builds_an_enriched_profile() {
    init_tracing();
    let provider = Arc::new(CountingProvider::default());
    let client = oauth20_test_client(Arc::clone(&provider));
    let store = InMemorySessionStore::new();

    // Outbound leg: the redirect parks the state under the user session.
    let outbound = MockWebContext::new();
    let action = client.redirection_action(&outbound, &store).await.unwrap();
    assert_eq!(action.status(), 302);
    assert!(action.location().contains("state=fixed-state"));
    assert!(action
        .location()
        .contains("redirect_uri=https%3A%2F%2Fapp.example.com%2Fcallback%3Fclient_name%3Dprovider"));
    assert_eq!(
        store.get(&outbound, "provider.oauth20.state").await.unwrap(),
        Some(json!("fixed-state"))
    );

    // Inbound leg: same session, provider comes back with code and state.
    let inbound = callback_context(&outbound.session_id());
    let profile = client.callback(&inbound, &store).await.unwrap().unwrap();

    assert_eq!(profile.id, "jdoe");
    assert_eq!(profile.client_name.as_deref(), Some("provider"));
    assert_eq!(
        profile.attributes.get("displayName"),
        Some(&json!("John Doe"))
    );
    assert_eq!(provider.code_exchanges.load(Ordering::SeqCst), 1);
    assert_eq!(provider.profile_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn replayed_callback_is_rejected() {
    init_tracing();
    let client = oauth20_test_client(Arc::new(CountingProvider::default()));
    let store = InMemorySessionStore::new();

    let outbound = MockWebContext::new();
    client.redirection_action(&outbound, &store).await.unwrap();

    let inbound = callback_context(&outbound.session_id());
    assert!(client.callback(&inbound, &store).await.unwrap().is_some());

    // The parked state was consumed by the first callback.
    let err = client.callback(&inbound, &store).await.unwrap_err();
    assert!(matches!(err, AuthError::StateMismatch { ref client } if client == "provider"));
}

#[tokio::test]
async fn callback_without_prior_redirect_is_rejected() {
    init_tracing();
    let client = oauth20_test_client(Arc::new(CountingProvider::default()));
    let store = InMemorySessionStore::new();

    let inbound = callback_context(&MockWebContext::new().session_id());
    let err = client.callback(&inbound, &store).await.unwrap_err();
    assert!(matches!(err, AuthError::StateMismatch { .. }));
}

#[tokio::test]
async fn fresh_profile_is_not_authorized_without_roles() {
    init_tracing();
    let client = oauth20_test_client(Arc::new(CountingProvider::default()));
    let store = InMemorySessionStore::new();

    let outbound = MockWebContext::new();
    client.redirection_action(&outbound, &store).await.unwrap();
    let inbound = callback_context(&outbound.session_id());
    let profile = client.callback(&inbound, &store).await.unwrap().unwrap();

    // No generator granted roles, so even the wildcard policy denies.
    let any_role = RequireAnyRoleAuthorizer::new(vec!["*".to_string()]);
    let authorized = any_role
        .is_authorized(&inbound, &store, &[profile])
        .await
        .unwrap();
    assert!(!authorized);
}
