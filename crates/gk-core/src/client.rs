//! The indirect client orchestrator.
//!
//! An indirect client authenticates users through a redirect to a third
//! party: it computes the redirect target (persisting any handshake state
//! first), then consumes the provider's callback by driving extraction,
//! validation, profile creation and authorization generation in order.

use std::sync::Arc;
use std::sync::OnceLock;

use async_trait::async_trait;
use url::Url;

use crate::authenticator::Authenticator;
use crate::authorization::AuthorizationGenerator;
use crate::context::WebContext;
use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};
use crate::extractor::CredentialsExtractor;
use crate::flow::CallbackFlow;
use crate::profile::{AttachedProfileCreator, ProfileCreator, UserProfile};
use crate::redirect::RedirectAction;
use crate::session::SessionStore;

/// Query parameter appended to the callback URL so the callback endpoint can
/// tell which configured client the response belongs to.
pub const CLIENT_NAME_PARAMETER: &str = "client_name";

/// Computes the protocol-specific redirect target.
///
/// Implementations must persist any handshake state (anti-CSRF state,
/// request token) in the session store *before* returning the action:
/// the browser may come back before anything run after the return.
#[async_trait]
pub trait RedirectionActionBuilder: Send + Sync {
    /// Builds the redirection action for the given request.
    async fn redirection_action(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
        callback_url: &str,
    ) -> AuthResult<RedirectAction>;
}

/// Merges a configured callback URL with the client name parameter.
///
/// Deterministic and idempotent: merging an already-merged URL returns it
/// unchanged.
///
/// # Errors
///
/// Returns a configuration error when the callback URL does not parse.
pub fn merge_client_name(callback_url: &str, client_name: &str) -> AuthResult<String> {
    let mut url = Url::parse(callback_url).map_err(|e| {
        AuthError::Configuration(format!("invalid callback URL {callback_url}: {e}"))
    })?;
    let already_present = url
        .query_pairs()
        .any(|(name, value)| name == CLIENT_NAME_PARAMETER && value == client_name);
    if !already_present {
        url.query_pairs_mut()
            .append_pair(CLIENT_NAME_PARAMETER, client_name);
    }
    Ok(url.into())
}

/// A redirect-based authentication client.
///
/// Owns one extractor, an optional authenticator (protocols whose profile
/// creator performs validation in the same round trip go without), one
/// profile creator and zero or more authorization generators. Constructed
/// through [`IndirectClient::builder`].
pub struct IndirectClient {
    name: String,
    callback_url: String,
    final_callback_url: OnceLock<String>,
    redirection: Box<dyn RedirectionActionBuilder>,
    extractor: Box<dyn CredentialsExtractor>,
    authenticator: Option<Arc<dyn Authenticator>>,
    profile_creator: Box<dyn ProfileCreator>,
    authorization_generators: Vec<Box<dyn AuthorizationGenerator>>,
    state_session_key: Option<String>,
}

impl std::fmt::Debug for IndirectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndirectClient")
            .field("name", &self.name)
            .field("callback_url", &self.callback_url)
            .finish_non_exhaustive()
    }
}

impl IndirectClient {
    /// Starts building a client with the given registered name and
    /// configured callback URL.
    #[must_use]
    pub fn builder(name: impl Into<String>, callback_url: impl Into<String>) -> IndirectClientBuilder {
        IndirectClientBuilder {
            name: name.into(),
            callback_url: callback_url.into(),
            redirection: None,
            extractor: None,
            authenticator: None,
            profile_creator: None,
            authorization_generators: Vec::new(),
            state_session_key: None,
        }
    }

    /// The registered client name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The callback URL with the client name merged in.
    ///
    /// Resolved lazily on first use and stable afterwards.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the configured callback URL does
    /// not parse.
    pub fn final_callback_url(&self) -> AuthResult<&str> {
        if let Some(url) = self.final_callback_url.get() {
            return Ok(url);
        }
        let merged = merge_client_name(&self.callback_url, &self.name)?;
        Ok(self.final_callback_url.get_or_init(|| merged))
    }

    /// Computes the redirect target for sending the user-agent to the
    /// provider, persisting handshake state before returning.
    ///
    /// # Errors
    ///
    /// Propagates configuration, session-store and transport failures from
    /// the underlying redirection builder.
    pub async fn redirection_action(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
    ) -> AuthResult<RedirectAction> {
        let callback_url = self.final_callback_url()?;
        self.redirection
            .redirection_action(context, session, callback_url)
            .await
    }

    /// Extracts credentials from a callback request.
    ///
    /// The persisted handshake state is read-once: whether extraction
    /// succeeds or fails hard, the state key is cleared, so a second
    /// callback replaying the same state is rejected. `Ok(None)` (request
    /// not carrying this protocol's marker) leaves the state untouched.
    ///
    /// # Errors
    ///
    /// Propagates hard extraction failures, including handshake state
    /// mismatches.
    pub async fn extract_credentials(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
    ) -> AuthResult<Option<Credentials>> {
        self.final_callback_url()?;
        let outcome = self.extractor.extract(context, session).await;

        let consumed = !matches!(outcome, Ok(None));
        if consumed {
            if let Some(key) = &self.state_session_key {
                if let Err(e) = session.remove(context, key).await {
                    tracing::warn!(client = %self.name, key, "failed to clear handshake state: {e}");
                }
            }
        }
        outcome
    }

    /// Validates credentials and builds the final enriched profile.
    ///
    /// # Errors
    ///
    /// Returns the validation, profile-creation or generator failure that
    /// terminated the flow.
    pub async fn user_profile(
        &self,
        credentials: Credentials,
        context: &dyn WebContext,
        session: &dyn SessionStore,
    ) -> AuthResult<UserProfile> {
        let flow = CallbackFlow::start(self.name.clone()).credentials_extracted(credentials);

        let flow = match &self.authenticator {
            Some(authenticator) => {
                let extracted = flow.credentials()?.clone();
                match authenticator.validate(extracted, context, session).await {
                    Ok(validated) => flow.authenticated(validated),
                    Err(e) => return Err(flow.rejected(e).into_error()),
                }
            }
            None => {
                let extracted = flow.credentials()?.clone();
                flow.authenticated(extracted)
            }
        };

        let mut profile = match self
            .profile_creator
            .create(flow.credentials()?, context, session)
            .await
        {
            Ok(profile) => profile,
            Err(e) => return Err(flow.profile_failed(e).into_error()),
        };
        profile.client_name = Some(self.name.clone());

        let mut flow = flow.profile_built(profile);
        for generator in &self.authorization_generators {
            if let Some(updated) = generator.generate(context, session, flow.profile()?).await? {
                flow = flow.enriched(updated);
            }
        }
        flow.into_profile()
    }

    /// Consumes a callback request end to end.
    ///
    /// Returns `Ok(None)` when the request does not carry this client's
    /// protocol marker, so several clients can be tried against the same
    /// callback endpoint.
    ///
    /// # Errors
    ///
    /// Propagates hard failures from any pipeline stage.
    pub async fn callback(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
    ) -> AuthResult<Option<UserProfile>> {
        match self.extract_credentials(context, session).await? {
            Some(credentials) => self
                .user_profile(credentials, context, session)
                .await
                .map(Some),
            None => Ok(None),
        }
    }
}

/// Builder for [`IndirectClient`].
pub struct IndirectClientBuilder {
    name: String,
    callback_url: String,
    redirection: Option<Box<dyn RedirectionActionBuilder>>,
    extractor: Option<Box<dyn CredentialsExtractor>>,
    authenticator: Option<Arc<dyn Authenticator>>,
    profile_creator: Option<Box<dyn ProfileCreator>>,
    authorization_generators: Vec<Box<dyn AuthorizationGenerator>>,
    state_session_key: Option<String>,
}

impl IndirectClientBuilder {
    /// Sets the redirection action builder (required).
    #[must_use]
    pub fn redirection(mut self, redirection: Box<dyn RedirectionActionBuilder>) -> Self {
        self.redirection = Some(redirection);
        self
    }

    /// Sets the credentials extractor (required).
    #[must_use]
    pub fn extractor(mut self, extractor: Box<dyn CredentialsExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Sets the authenticator. Optional: protocols whose profile creator
    /// validates in the same round trip go without one.
    #[must_use]
    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Sets the profile creator. Defaults to [`AttachedProfileCreator`].
    #[must_use]
    pub fn profile_creator(mut self, profile_creator: Box<dyn ProfileCreator>) -> Self {
        self.profile_creator = Some(profile_creator);
        self
    }

    /// Appends an authorization generator. Generators run in the order
    /// they were added.
    #[must_use]
    pub fn authorization_generator(
        mut self,
        generator: Box<dyn AuthorizationGenerator>,
    ) -> Self {
        self.authorization_generators.push(generator);
        self
    }

    /// Declares the session key under which this client parks handshake
    /// state, enabling read-once clearing on callback consumption.
    #[must_use]
    pub fn state_session_key(mut self, key: impl Into<String>) -> Self {
        self.state_session_key = Some(key.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a required component is missing
    /// or the client name is empty.
    pub fn build(self) -> AuthResult<IndirectClient> {
        if self.name.is_empty() {
            return Err(AuthError::Configuration("client name must not be empty".to_string()));
        }
        let redirection = self
            .redirection
            .ok_or_else(|| AuthError::Configuration("redirection builder is required".to_string()))?;
        let extractor = self
            .extractor
            .ok_or_else(|| AuthError::Configuration("credentials extractor is required".to_string()))?;
        Ok(IndirectClient {
            name: self.name,
            callback_url: self.callback_url,
            final_callback_url: OnceLock::new(),
            redirection,
            extractor,
            authenticator: self.authenticator,
            profile_creator: self
                .profile_creator
                .unwrap_or_else(|| Box::new(AttachedProfileCreator)),
            authorization_generators: self.authorization_generators,
            state_session_key: self.state_session_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::context::MockWebContext;
    use crate::session::InMemorySessionStore;

    struct StaticRedirection;

    #[async_trait]
    impl RedirectionActionBuilder for StaticRedirection {
        async fn redirection_action(
            &self,
            _context: &dyn WebContext,
            session: &dyn SessionStore,
            callback_url: &str,
        ) -> AuthResult<RedirectAction> {
            // Real builders persist handshake state before returning.
            let _ = session;
            Ok(RedirectAction::Found(format!(
                "https://provider.example.com/auth?redirect_uri={}",
                urlencoded(callback_url)
            )))
        }
    }

    fn urlencoded(value: &str) -> String {
        value.replace(':', "%3A").replace('/', "%2F")
    }

    /// Extracts a token parameter, verified against the parked state.
    struct StateCheckedExtractor;

    #[async_trait]
    impl CredentialsExtractor for StateCheckedExtractor {
        async fn extract(
            &self,
            context: &dyn WebContext,
            session: &dyn SessionStore,
        ) -> AuthResult<Option<Credentials>> {
            let Some(token) = context.request_parameter("token") else {
                return Ok(None);
            };
            let expected = session.get(context, "test.state").await?;
            match (expected, context.request_parameter("state")) {
                (Some(expected), Some(actual)) if expected == json!(actual) => {}
                _ => {
                    return Err(AuthError::StateMismatch {
                        client: "test".to_string(),
                    })
                }
            }
            Ok(Some(Credentials::username_password(token, "-")))
        }
    }

    struct IdentityAuthenticator;

    #[async_trait]
    impl Authenticator for IdentityAuthenticator {
        async fn validate(
            &self,
            credentials: Credentials,
            _context: &dyn WebContext,
            _session: &dyn SessionStore,
        ) -> AuthResult<Credentials> {
            let id = match credentials.kind() {
                crate::credentials::CredentialsKind::UsernamePassword { username, .. } => {
                    username.clone()
                }
                _ => "anonymous".to_string(),
            };
            Ok(credentials.with_profile(UserProfile::new(id)))
        }
    }

    struct RoleGranter(&'static str);

    #[async_trait]
    impl AuthorizationGenerator for RoleGranter {
        async fn generate(
            &self,
            _context: &dyn WebContext,
            _session: &dyn SessionStore,
            profile: &UserProfile,
        ) -> AuthResult<Option<UserProfile>> {
            let mut updated = profile.clone();
            updated.add_role(self.0);
            Ok(Some(updated))
        }
    }

    struct SilentGenerator;

    #[async_trait]
    impl AuthorizationGenerator for SilentGenerator {
        async fn generate(
            &self,
            _context: &dyn WebContext,
            _session: &dyn SessionStore,
            _profile: &UserProfile,
        ) -> AuthResult<Option<UserProfile>> {
            Ok(None)
        }
    }

    fn client() -> IndirectClient {
        IndirectClient::builder("test", "https://app.example.com/callback")
            .redirection(Box::new(StaticRedirection))
            .extractor(Box::new(StateCheckedExtractor))
            .authenticator(Arc::new(IdentityAuthenticator))
            .authorization_generator(Box::new(RoleGranter("user")))
            .authorization_generator(Box::new(SilentGenerator))
            .state_session_key("test.state")
            .build()
            .unwrap()
    }

    #[test]
    fn callback_url_merge_is_deterministic_and_idempotent() {
        let once = merge_client_name("https://app.example.com/callback", "test").unwrap();
        assert_eq!(once, "https://app.example.com/callback?client_name=test");

        let twice = merge_client_name(&once, "test").unwrap();
        assert_eq!(once, twice);

        let merged = merge_client_name("https://app.example.com/callback?x=1", "test").unwrap();
        assert_eq!(merged, "https://app.example.com/callback?x=1&client_name=test");
    }

    #[test]
    fn final_callback_url_is_stable_across_calls() {
        let client = client();
        let first = client.final_callback_url().unwrap().to_string();
        let second = client.final_callback_url().unwrap().to_string();
        assert_eq!(first, second);
        assert!(first.contains("client_name=test"));
    }

    #[test]
    fn build_rejects_missing_components() {
        let err = IndirectClient::builder("test", "https://app.example.com/cb")
            .redirection(Box::new(StaticRedirection))
            .build()
            .unwrap_err();
        assert!(matches!(err, AuthError::Configuration(_)));
    }

    #[tokio::test]
    async fn full_callback_builds_enriched_profile() {
        let client = client();
        let store = InMemorySessionStore::new();
        let context = MockWebContext::new()
            .with_parameter("token", "jdoe")
            .with_parameter("state", "abc");
        store.set(&context, "test.state", json!("abc")).await.unwrap();

        let profile = client.callback(&context, &store).await.unwrap().unwrap();
        assert_eq!(profile.id, "jdoe");
        assert_eq!(profile.client_name.as_deref(), Some("test"));
        assert!(profile.has_role("user"));
    }

    #[tokio::test]
    async fn state_is_consumed_read_once() {
        let client = client();
        let store = InMemorySessionStore::new();
        let context = MockWebContext::new()
            .with_parameter("token", "jdoe")
            .with_parameter("state", "abc");
        store.set(&context, "test.state", json!("abc")).await.unwrap();

        assert!(client.callback(&context, &store).await.unwrap().is_some());

        // Replaying the same callback finds no parked state and fails hard.
        let err = client.callback(&context, &store).await.unwrap_err();
        assert!(matches!(err, AuthError::StateMismatch { .. }));
    }

    #[tokio::test]
    async fn state_mismatch_clears_the_parked_state_too() {
        let client = client();
        let store = InMemorySessionStore::new();
        let context = MockWebContext::new()
            .with_parameter("token", "jdoe")
            .with_parameter("state", "attacker");
        store.set(&context, "test.state", json!("abc")).await.unwrap();

        let err = client.callback(&context, &store).await.unwrap_err();
        assert!(matches!(err, AuthError::StateMismatch { .. }));
        assert!(store.get(&context, "test.state").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn non_matching_request_is_not_an_error() {
        let client = client();
        let store = InMemorySessionStore::new();
        let context = MockWebContext::new();

        assert!(client.callback(&context, &store).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn redirection_delegates_to_builder() {
        let client = client();
        let store = InMemorySessionStore::new();
        let context = MockWebContext::new();

        let action = client.redirection_action(&context, &store).await.unwrap();
        assert_eq!(action.status(), 302);
        assert!(action.location().starts_with("https://provider.example.com/auth"));
    }
}
