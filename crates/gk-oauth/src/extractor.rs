//! OAuth callback credential extractors.

use async_trait::async_trait;
use gk_core::{
    AuthError, AuthResult, Credentials, CredentialsExtractor, CredentialsKind,
    OAuth10RequestToken, SessionStore, WebContext,
};
use serde_json::json;

use crate::config::{
    OAuth10Configuration, OAuth20Configuration, OAUTH_CODE, OAUTH_TOKEN, OAUTH_VERIFIER,
    STATE_PARAMETER,
};

/// Extracts OAuth 2.0 callback credentials (`code` + `state`).
///
/// When state handling is enabled, the callback's `state` parameter is
/// compared against the value parked in the session before the redirect.
/// Any discrepancy, including a missing parked value, is a hard
/// [`AuthError::StateMismatch`]: a broken handshake indicates a potential
/// CSRF attempt and must never be swallowed as "not applicable".
pub struct OAuth20CredentialsExtractor {
    client_name: String,
    with_state: bool,
    state_session_key: String,
}

impl OAuth20CredentialsExtractor {
    /// Creates the extractor for the named client.
    #[must_use]
    pub fn new(configuration: &OAuth20Configuration, client_name: impl Into<String>) -> Self {
        let client_name = client_name.into();
        Self {
            state_session_key: configuration.state_session_key(&client_name),
            with_state: configuration.with_state,
            client_name,
        }
    }

    async fn verify_state(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
    ) -> AuthResult<()> {
        let parked = session.get(context, &self.state_session_key).await?;
        let returned = context.request_parameter(STATE_PARAMETER);
        match (parked, returned) {
            (Some(parked), Some(returned)) if parked == json!(returned) => {
                tracing::debug!(client = %self.client_name, "state verified");
                Ok(())
            }
            _ => Err(AuthError::StateMismatch {
                client: self.client_name.clone(),
            }),
        }
    }
}

#[async_trait]
impl CredentialsExtractor for OAuth20CredentialsExtractor {
    async fn extract(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
    ) -> AuthResult<Option<Credentials>> {
        if self.with_state {
            self.verify_state(context, session).await?;
        }

        let Some(code) = context.request_parameter(OAUTH_CODE) else {
            return Err(AuthError::MalformedCredentials(
                "no credential found in OAuth 2.0 callback".to_string(),
            ));
        };
        tracing::debug!(client = %self.client_name, "authorization code extracted");
        Ok(Some(Credentials::new(CredentialsKind::OAuth20 { code })))
    }
}

/// Extracts OAuth 1.0a callback credentials (`oauth_token` +
/// `oauth_verifier`), paired with the request token parked in the session
/// before the redirect.
///
/// The parked request token is read but not required: a missing token
/// yields credentials without one, and the access-token exchange decides
/// their fate.
pub struct OAuth10CredentialsExtractor {
    client_name: String,
    request_token_session_key: String,
}

impl OAuth10CredentialsExtractor {
    /// Creates the extractor for the named client.
    #[must_use]
    pub fn new(configuration: &OAuth10Configuration, client_name: impl Into<String>) -> Self {
        let client_name = client_name.into();
        Self {
            request_token_session_key: configuration.request_token_session_key(&client_name),
            client_name,
        }
    }
}

#[async_trait]
impl CredentialsExtractor for OAuth10CredentialsExtractor {
    async fn extract(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
    ) -> AuthResult<Option<Credentials>> {
        let token = context.request_parameter(OAUTH_TOKEN);
        let verifier = context.request_parameter(OAUTH_VERIFIER);
        let (Some(token), Some(verifier)) = (token, verifier) else {
            return Err(AuthError::MalformedCredentials(
                "no credential found in OAuth 1.0 callback".to_string(),
            ));
        };

        let request_token = session
            .get(context, &self.request_token_session_key)
            .await?
            .and_then(|value| serde_json::from_value::<OAuth10RequestToken>(value).ok());
        tracing::debug!(
            client = %self.client_name,
            has_request_token = request_token.is_some(),
            "token and verifier extracted"
        );

        Ok(Some(Credentials::new(CredentialsKind::OAuth10 {
            request_token,
            token,
            verifier,
        })))
    }
}
