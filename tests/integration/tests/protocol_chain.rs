//! Several protocols sharing one callback endpoint.

use base64::Engine;
use gk_core::{
    AuthError, CredentialsExtractor, CredentialsKind, ExtractorChain, InMemorySessionStore,
    MockWebContext, SessionStore,
};
use gk_kerberos::KerberosExtractor;
use gk_saml::{Saml2Configuration, Saml2CredentialsExtractor, SamlBinding};
use serde_json::json;

use crate::common::init_tracing;

fn chain() -> ExtractorChain {
    let saml_config = Saml2Configuration::new("https://sp.example.com", "https://idp.example.com/sso");
    ExtractorChain::new()
        .with(Box::new(KerberosExtractor))
        .with(Box::new(Saml2CredentialsExtractor::new(&saml_config, "idp")))
}

#[tokio::test]
async fn negotiate_header_is_claimed_by_kerberos() {
    init_tracing();
    let store = InMemorySessionStore::new();
    let encoded = base64::engine::general_purpose::STANDARD.encode(b"ap-req");
    let context = MockWebContext::new().with_header("Authorization", format!("Negotiate {encoded}"));

    let credentials = chain().extract(&context, &store).await.unwrap().unwrap();
    assert!(matches!(
        credentials.kind(),
        CredentialsKind::Kerberos { ticket } if ticket == b"ap-req"
    ));
}

#[tokio::test]
async fn saml_response_falls_through_to_the_saml_extractor() {
    init_tracing();
    let store = InMemorySessionStore::new();
    let encoded = SamlBinding::Post.encode("<samlp:Response/>").unwrap();
    let context = MockWebContext::new()
        .with_parameter("SAMLResponse", encoded)
        .with_parameter("RelayState", "rs-1");
    store
        .set(&context, "idp.saml.relay_state", json!("rs-1"))
        .await
        .unwrap();

    let credentials = chain().extract(&context, &store).await.unwrap().unwrap();
    assert!(matches!(
        credentials.kind(),
        CredentialsKind::SamlAssertion { .. }
    ));
}

#[tokio::test]
async fn unmarked_request_matches_no_protocol() {
    init_tracing();
    let store = InMemorySessionStore::new();
    let context = MockWebContext::new().with_header("Authorization", "Bearer jwt-ish");

    assert!(chain().extract(&context, &store).await.unwrap().is_none());
}

#[tokio::test]
async fn corrupt_payload_stops_the_chain() {
    init_tracing();
    let store = InMemorySessionStore::new();
    let context = MockWebContext::new().with_header("Authorization", "Negotiate %%%corrupt%%%");

    let err = chain().extract(&context, &store).await.unwrap_err();
    assert!(matches!(err, AuthError::MalformedCredentials(_)));
}
