//! OAuth profile creation.
//!
//! For OAuth, validation and profile assembly are the same network round
//! trip: the profile creator exchanges the extracted credentials for an
//! access token and fetches the raw profile in one go, so the clients built
//! by this crate carry no separate authenticator.

use std::sync::Arc;

use async_trait::async_trait;
use gk_core::{
    AuthError, AuthResult, Credentials, CredentialsKind, ProfileCreator, SessionStore,
    UserProfile, WebContext,
};
use serde_json::Value;

use crate::provider::OAuthProvider;

/// Maps a provider's raw profile JSON into a [`UserProfile`].
///
/// Provider-specific field mapping is not the pipeline's business; this
/// trait is the seam where the embedder plugs it in.
pub trait ProfileDefinition: Send + Sync {
    /// Extracts the user identifier from the raw profile, if present.
    fn profile_id(&self, raw: &Value) -> Option<String>;

    /// Converts the raw profile into a [`UserProfile`].
    ///
    /// The default implementation takes the id from [`profile_id`] and
    /// copies every top-level field into the profile's attributes.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ProfileCreation`] when no usable identifier is
    /// present.
    ///
    /// [`profile_id`]: ProfileDefinition::profile_id
    fn convert(&self, raw: &Value) -> AuthResult<UserProfile> {
        let id = self.profile_id(raw).ok_or_else(|| {
            AuthError::ProfileCreation("no profile id in provider response".to_string())
        })?;
        let mut profile = UserProfile::new(id);
        if let Some(fields) = raw.as_object() {
            for (name, value) in fields {
                profile.add_attribute(name.clone(), value.clone());
            }
        }
        Ok(profile)
    }
}

/// Reads the id from a configurable top-level field (`"id"` by default).
#[derive(Debug, Clone)]
pub struct BasicProfileDefinition {
    id_field: String,
}

impl BasicProfileDefinition {
    /// Creates a definition reading the id from the given field.
    #[must_use]
    pub fn new(id_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
        }
    }
}

impl Default for BasicProfileDefinition {
    fn default() -> Self {
        Self::new("id")
    }
}

impl ProfileDefinition for BasicProfileDefinition {
    fn profile_id(&self, raw: &Value) -> Option<String> {
        match raw.get(&self.id_field) {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        }
    }
}

/// Profile creator for OAuth 2.0: exchanges the authorization code, fetches
/// the raw profile and maps it.
pub struct OAuth20ProfileCreator {
    provider: Arc<dyn OAuthProvider>,
    definition: Box<dyn ProfileDefinition>,
    callback_url: String,
}

impl OAuth20ProfileCreator {
    /// Creates the profile creator.
    ///
    /// `callback_url` must be the final callback URL used for the redirect;
    /// providers verify it during the code exchange.
    #[must_use]
    pub fn new(
        provider: Arc<dyn OAuthProvider>,
        definition: Box<dyn ProfileDefinition>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            definition,
            callback_url: callback_url.into(),
        }
    }
}

#[async_trait]
impl ProfileCreator for OAuth20ProfileCreator {
    async fn create(
        &self,
        credentials: &Credentials,
        _context: &dyn WebContext,
        _session: &dyn SessionStore,
    ) -> AuthResult<UserProfile> {
        let CredentialsKind::OAuth20 { code } = credentials.kind() else {
            return Err(AuthError::CredentialsRejected(
                "not OAuth 2.0 credentials".to_string(),
            ));
        };
        let token = self.provider.exchange_code(code, &self.callback_url).await?;
        let raw = self.provider.fetch_profile(&token).await?;
        self.definition.convert(&raw)
    }
}

/// Profile creator for OAuth 1.0a: exchanges the token/verifier pair,
/// fetches the raw profile and maps it.
pub struct OAuth10ProfileCreator {
    provider: Arc<dyn OAuthProvider>,
    definition: Box<dyn ProfileDefinition>,
}

impl OAuth10ProfileCreator {
    /// Creates the profile creator.
    #[must_use]
    pub fn new(provider: Arc<dyn OAuthProvider>, definition: Box<dyn ProfileDefinition>) -> Self {
        Self {
            provider,
            definition,
        }
    }
}

#[async_trait]
impl ProfileCreator for OAuth10ProfileCreator {
    async fn create(
        &self,
        credentials: &Credentials,
        _context: &dyn WebContext,
        _session: &dyn SessionStore,
    ) -> AuthResult<UserProfile> {
        let CredentialsKind::OAuth10 {
            request_token,
            token,
            verifier,
        } = credentials.kind()
        else {
            return Err(AuthError::CredentialsRejected(
                "not OAuth 1.0 credentials".to_string(),
            ));
        };
        let access_token = self
            .provider
            .exchange_request_token(request_token.as_ref(), token, verifier)
            .await?;
        let raw = self.provider.fetch_profile(&access_token).await?;
        self.definition.convert(&raw)
    }
}
