//! OAuth client assembly and redirection builders.

use std::sync::Arc;

use async_trait::async_trait;
use gk_core::{
    merge_client_name, AuthError, AuthResult, IndirectClient, RedirectAction,
    RedirectionActionBuilder, SessionStore, WebContext,
};
use serde_json::json;

use crate::config::{OAuth10Configuration, OAuth20Configuration};
use crate::extractor::{OAuth10CredentialsExtractor, OAuth20CredentialsExtractor};
use crate::profile::{OAuth10ProfileCreator, OAuth20ProfileCreator, ProfileDefinition};
use crate::provider::OAuthProvider;

/// Builds the OAuth 2.0 authorization redirect.
///
/// When state handling is enabled, the generated `state` value is persisted
/// in the session *before* the action is returned, so the browser cannot
/// come back ahead of the stored handshake state.
pub struct OAuth20RedirectionActionBuilder {
    configuration: Arc<OAuth20Configuration>,
    client_name: String,
}

impl OAuth20RedirectionActionBuilder {
    /// Creates the builder for the named client.
    #[must_use]
    pub fn new(configuration: Arc<OAuth20Configuration>, client_name: impl Into<String>) -> Self {
        Self {
            configuration,
            client_name: client_name.into(),
        }
    }
}

#[async_trait]
impl RedirectionActionBuilder for OAuth20RedirectionActionBuilder {
    async fn redirection_action(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
        callback_url: &str,
    ) -> AuthResult<RedirectAction> {
        let config = &self.configuration;
        let mut url = format!(
            "{}?response_type=code&client_id={}&redirect_uri={}",
            config.auth_url,
            urlencoding::encode(&config.key),
            urlencoding::encode(callback_url),
        );
        if let Some(scope) = &config.scope {
            url.push_str(&format!("&scope={}", urlencoding::encode(scope)));
        }
        for (name, value) in &config.custom_params {
            url.push_str(&format!(
                "&{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            ));
        }

        if config.with_state {
            let state = config.state_generator.generate_value();
            let key = config.state_session_key(&self.client_name);
            session.set(context, &key, json!(state)).await?;
            tracing::debug!(client = %self.client_name, "state persisted before redirect");
            url.push_str(&format!("&state={}", urlencoding::encode(&state)));
        }

        Ok(RedirectAction::Found(url))
    }
}

/// Builds the OAuth 1.0a authorization redirect.
///
/// Performs the first leg of the three-legged dance: obtains a request
/// token from the provider, parks it in the session, then redirects the
/// user-agent to the authorization endpoint carrying the token.
pub struct OAuth10RedirectionActionBuilder {
    configuration: Arc<OAuth10Configuration>,
    provider: Arc<dyn OAuthProvider>,
    client_name: String,
}

impl OAuth10RedirectionActionBuilder {
    /// Creates the builder for the named client.
    #[must_use]
    pub fn new(
        configuration: Arc<OAuth10Configuration>,
        provider: Arc<dyn OAuthProvider>,
        client_name: impl Into<String>,
    ) -> Self {
        Self {
            configuration,
            provider,
            client_name: client_name.into(),
        }
    }
}

#[async_trait]
impl RedirectionActionBuilder for OAuth10RedirectionActionBuilder {
    async fn redirection_action(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
        callback_url: &str,
    ) -> AuthResult<RedirectAction> {
        let request_token = self.provider.fetch_request_token(callback_url).await?;
        let key = self
            .configuration
            .request_token_session_key(&self.client_name);
        let value = serde_json::to_value(&request_token)
            .map_err(|e| AuthError::Session(format!("cannot serialize request token: {e}")))?;
        session.set(context, &key, value).await?;
        tracing::debug!(client = %self.client_name, "request token persisted before redirect");

        let url = format!(
            "{}?oauth_token={}",
            self.configuration.authorize_url,
            urlencoding::encode(&request_token.token),
        );
        Ok(RedirectAction::Found(url))
    }
}

/// Assembles an OAuth 2.0 [`IndirectClient`].
///
/// # Errors
///
/// Returns a configuration error when the callback URL does not parse.
pub fn oauth20_client(
    name: &str,
    callback_url: &str,
    configuration: OAuth20Configuration,
    provider: Arc<dyn OAuthProvider>,
    definition: Box<dyn ProfileDefinition>,
) -> AuthResult<IndirectClient> {
    let configuration = Arc::new(configuration);
    // The same merged URL the redirect will use; providers verify it during
    // the code exchange.
    let final_callback_url = merge_client_name(callback_url, name)?;

    IndirectClient::builder(name, callback_url)
        .redirection(Box::new(OAuth20RedirectionActionBuilder::new(
            Arc::clone(&configuration),
            name,
        )))
        .extractor(Box::new(OAuth20CredentialsExtractor::new(&configuration, name)))
        .profile_creator(Box::new(OAuth20ProfileCreator::new(
            provider,
            definition,
            final_callback_url,
        )))
        .state_session_key(configuration.state_session_key(name))
        .build()
}

/// Assembles an OAuth 1.0a [`IndirectClient`].
///
/// # Errors
///
/// Returns a configuration error when the callback URL does not parse.
pub fn oauth10_client(
    name: &str,
    callback_url: &str,
    configuration: OAuth10Configuration,
    provider: Arc<dyn OAuthProvider>,
    definition: Box<dyn ProfileDefinition>,
) -> AuthResult<IndirectClient> {
    let configuration = Arc::new(configuration);

    IndirectClient::builder(name, callback_url)
        .redirection(Box::new(OAuth10RedirectionActionBuilder::new(
            Arc::clone(&configuration),
            Arc::clone(&provider),
            name,
        )))
        .extractor(Box::new(OAuth10CredentialsExtractor::new(&configuration, name)))
        .profile_creator(Box::new(OAuth10ProfileCreator::new(provider, definition)))
        .state_session_key(configuration.request_token_session_key(name))
        .build()
}
