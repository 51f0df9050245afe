//! SAML callback extraction.

use async_trait::async_trait;
use gk_core::{
    AuthError, AuthResult, Credentials, CredentialsExtractor, CredentialsKind, SessionStore,
    WebContext,
};
use serde_json::json;

use crate::binding::{SamlBinding, RELAY_STATE_PARAMETER, SAML_RESPONSE_PARAMETER};
use crate::config::Saml2Configuration;

/// Extracts the identity provider's response from the callback request.
///
/// A request without a `SAMLResponse` parameter is not a SAML callback and
/// yields "not applicable". Once the parameter is present, the echoed
/// `RelayState` must match the value parked before the redirect; any
/// discrepancy is a hard [`AuthError::StateMismatch`], exactly as for the
/// OAuth 2.0 `state` parameter.
pub struct Saml2CredentialsExtractor {
    client_name: String,
    binding: SamlBinding,
    relay_state_session_key: String,
}

impl Saml2CredentialsExtractor {
    /// Creates the extractor for the named client.
    #[must_use]
    pub fn new(configuration: &Saml2Configuration, client_name: impl Into<String>) -> Self {
        let client_name = client_name.into();
        Self {
            relay_state_session_key: configuration.relay_state_session_key(&client_name),
            binding: configuration.binding,
            client_name,
        }
    }

    async fn verify_relay_state(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
    ) -> AuthResult<Option<String>> {
        let parked = session.get(context, &self.relay_state_session_key).await?;
        let returned = context.request_parameter(RELAY_STATE_PARAMETER);
        match (parked, returned) {
            (Some(parked), Some(returned)) if parked == json!(returned) => {
                tracing::debug!(client = %self.client_name, "relay state verified");
                Ok(Some(returned))
            }
            _ => Err(AuthError::StateMismatch {
                client: self.client_name.clone(),
            }),
        }
    }
}

#[async_trait]
impl CredentialsExtractor for Saml2CredentialsExtractor {
    async fn extract(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
    ) -> AuthResult<Option<Credentials>> {
        let Some(encoded) = context.request_parameter(SAML_RESPONSE_PARAMETER) else {
            return Ok(None);
        };

        let relay_state = self.verify_relay_state(context, session).await?;
        let response = self.binding.decode(&encoded)?;
        tracing::debug!(
            client = %self.client_name,
            response_len = response.len(),
            "assertion response extracted"
        );

        Ok(Some(Credentials::new(CredentialsKind::SamlAssertion {
            response,
            relay_state,
        })))
    }
}
