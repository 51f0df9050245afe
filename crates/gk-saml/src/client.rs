//! SAML client assembly and redirection builder.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use gk_core::{
    AuthResult, IndirectClient, RedirectAction, RedirectionActionBuilder, SessionStore,
    WebContext,
};
use serde_json::json;
use uuid::Uuid;

use crate::authenticator::{AssertionValidator, Saml2Authenticator};
use crate::binding::redirect_request_url;
use crate::config::Saml2Configuration;
use crate::extractor::Saml2CredentialsExtractor;

/// Builds the authentication request redirect to the identity provider.
///
/// Generates a fresh relay state, parks it in the session, then sends the
/// user-agent to the SSO endpoint with a DEFLATE-compressed `AuthnRequest`
/// on the HTTP-Redirect binding.
pub struct Saml2RedirectionActionBuilder {
    configuration: Arc<Saml2Configuration>,
    client_name: String,
}

impl Saml2RedirectionActionBuilder {
    /// Creates the builder for the named client.
    #[must_use]
    pub fn new(configuration: Arc<Saml2Configuration>, client_name: impl Into<String>) -> Self {
        Self {
            configuration,
            client_name: client_name.into(),
        }
    }
}

#[async_trait]
impl RedirectionActionBuilder for Saml2RedirectionActionBuilder {
    async fn redirection_action(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
        callback_url: &str,
    ) -> AuthResult<RedirectAction> {
        let config = &self.configuration;
        let relay_state = config.relay_state_generator.generate_value();
        let key = config.relay_state_session_key(&self.client_name);
        session.set(context, &key, json!(relay_state)).await?;
        tracing::debug!(client = %self.client_name, "relay state persisted before redirect");

        let request = authn_request(&config.entity_id, &config.idp_sso_url, callback_url);
        let url = redirect_request_url(&request, &config.idp_sso_url, Some(&relay_state))?;
        Ok(RedirectAction::Found(url))
    }
}

// Minimal AuthnRequest; signing and extensions are the embedder's concern.
fn authn_request(entity_id: &str, destination: &str, callback_url: &str) -> String {
    let id = format!("_{}", Uuid::now_v7());
    let issue_instant = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    format!(
        concat!(
            r#"<samlp:AuthnRequest xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" "#,
            r#"xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" "#,
            r#"ID="{id}" Version="2.0" IssueInstant="{issue_instant}" "#,
            r#"Destination="{destination}" AssertionConsumerServiceURL="{callback_url}">"#,
            r#"<saml:Issuer>{entity_id}</saml:Issuer>"#,
            r#"</samlp:AuthnRequest>"#,
        ),
        id = id,
        issue_instant = issue_instant,
        destination = destination,
        callback_url = callback_url,
        entity_id = entity_id,
    )
}

/// Assembles a SAML 2.0 [`IndirectClient`].
///
/// # Errors
///
/// Returns a configuration error when the callback URL does not parse.
pub fn saml2_client(
    name: &str,
    callback_url: &str,
    configuration: Saml2Configuration,
    validator: Arc<dyn AssertionValidator>,
) -> AuthResult<IndirectClient> {
    let configuration = Arc::new(configuration);

    IndirectClient::builder(name, callback_url)
        .redirection(Box::new(Saml2RedirectionActionBuilder::new(
            Arc::clone(&configuration),
            name,
        )))
        .extractor(Box::new(Saml2CredentialsExtractor::new(&configuration, name)))
        .authenticator(Arc::new(Saml2Authenticator::new(validator)))
        .state_session_key(configuration.relay_state_session_key(name))
        .build()
}
