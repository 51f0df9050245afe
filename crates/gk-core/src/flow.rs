//! Callback processing state machine.
//!
//! Type-safe state machine for consuming a provider callback, ensuring the
//! extraction, authentication, profile-building and enrichment stages happen
//! in order. The generic parameter is a phantom state type; invalid
//! transitions do not compile. No state is reentrant for a single callback:
//! each transition consumes the flow.

use std::marker::PhantomData;

use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};
use crate::profile::UserProfile;

/// Callback flow states.
pub mod states {
    /// A callback request arrived and is awaiting extraction.
    #[derive(Debug, Clone, Copy)]
    pub struct CallbackPending;

    /// Credentials were extracted from the callback.
    #[derive(Debug, Clone, Copy)]
    pub struct CredentialsExtracted;

    /// The credentials were validated.
    #[derive(Debug, Clone, Copy)]
    pub struct Authenticated;

    /// The user profile was built.
    #[derive(Debug, Clone, Copy)]
    pub struct ProfileBuilt;

    /// A stage failed; the flow terminated.
    #[derive(Debug)]
    pub struct Failed;
}

/// Callback flow context.
///
/// The generic parameter `S` represents the current state.
#[derive(Debug)]
pub struct CallbackFlow<S> {
    client_name: String,
    credentials: Option<Credentials>,
    profile: Option<UserProfile>,
    error: Option<AuthError>,
    _state: PhantomData<S>,
}

impl<S> CallbackFlow<S> {
    /// Name of the client driving this callback.
    #[must_use]
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    fn transition<T>(self) -> CallbackFlow<T> {
        CallbackFlow {
            client_name: self.client_name,
            credentials: self.credentials,
            profile: self.profile,
            error: self.error,
            _state: PhantomData,
        }
    }

    fn stored_credentials(&self) -> AuthResult<&Credentials> {
        self.credentials.as_ref().ok_or_else(|| {
            AuthError::Configuration("callback flow lost its credentials".to_string())
        })
    }
}

impl CallbackFlow<states::CallbackPending> {
    /// Starts a flow for a callback handled by the named client.
    #[must_use]
    pub fn start(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            credentials: None,
            profile: None,
            error: None,
            _state: PhantomData,
        }
    }

    /// Credentials were extracted; proceed to authentication.
    #[must_use]
    pub fn credentials_extracted(
        mut self,
        credentials: Credentials,
    ) -> CallbackFlow<states::CredentialsExtracted> {
        tracing::debug!(client = %self.client_name, "credentials extracted");
        self.credentials = Some(credentials);
        self.transition()
    }

    /// Extraction failed hard.
    #[must_use]
    pub fn extraction_failed(mut self, error: AuthError) -> CallbackFlow<states::Failed> {
        self.error = Some(error);
        self.transition()
    }
}

impl CallbackFlow<states::CredentialsExtracted> {
    /// The extracted credentials awaiting validation.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the flow was built without
    /// credentials, which cannot happen through the public transitions.
    pub fn credentials(&self) -> AuthResult<&Credentials> {
        self.stored_credentials()
    }

    /// Validation succeeded with the given (profile-carrying) credentials.
    #[must_use]
    pub fn authenticated(mut self, validated: Credentials) -> CallbackFlow<states::Authenticated> {
        tracing::debug!(client = %self.client_name, "credentials validated");
        self.credentials = Some(validated);
        self.transition()
    }

    /// Validation rejected the credentials.
    #[must_use]
    pub fn rejected(mut self, error: AuthError) -> CallbackFlow<states::Failed> {
        self.error = Some(error);
        self.transition()
    }
}

impl CallbackFlow<states::Authenticated> {
    /// The validated credentials awaiting profile creation.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the flow was built without
    /// credentials, which cannot happen through the public transitions.
    pub fn credentials(&self) -> AuthResult<&Credentials> {
        self.stored_credentials()
    }

    /// Profile creation succeeded.
    #[must_use]
    pub fn profile_built(mut self, profile: UserProfile) -> CallbackFlow<states::ProfileBuilt> {
        tracing::debug!(client = %self.client_name, profile_id = %profile.id, "profile built");
        self.profile = Some(profile);
        self.transition()
    }

    /// Profile creation failed.
    #[must_use]
    pub fn profile_failed(mut self, error: AuthError) -> CallbackFlow<states::Failed> {
        self.error = Some(error);
        self.transition()
    }
}

impl CallbackFlow<states::ProfileBuilt> {
    /// The profile built so far.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the flow was built without a
    /// profile, which cannot happen through the public transitions.
    pub fn profile(&self) -> AuthResult<&UserProfile> {
        self.profile.as_ref().ok_or_else(|| {
            AuthError::Configuration("callback flow lost its profile".to_string())
        })
    }

    /// Replaces the profile with an enriched version from an authorization
    /// generator. Stays in the same state; generators may chain.
    #[must_use]
    pub fn enriched(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Finishes the flow, yielding the profile.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the flow was built without a
    /// profile, which cannot happen through the public transitions.
    pub fn into_profile(self) -> AuthResult<UserProfile> {
        self.profile.ok_or_else(|| {
            AuthError::Configuration("callback flow lost its profile".to_string())
        })
    }
}

impl CallbackFlow<states::Failed> {
    /// The failure that terminated the flow.
    #[must_use]
    pub fn error(&self) -> Option<&AuthError> {
        self.error.as_ref()
    }

    /// Converts the terminated flow into its failure.
    #[must_use]
    pub fn into_error(self) -> AuthError {
        self.error
            .unwrap_or_else(|| AuthError::Configuration("callback flow failed without error".to_string()))
    }
}
