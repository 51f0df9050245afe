//! Credential validation.

use async_trait::async_trait;

use crate::context::WebContext;
use crate::credentials::Credentials;
use crate::error::AuthResult;
use crate::session::SessionStore;

/// Validates a credential bundle and attaches the resolved profile.
///
/// Validation is expected to be idempotent with respect to the credential's
/// identity: given equal credentials and no external state change, repeated
/// calls return the same outcome. That assumption is what makes the result
/// cacheable (see [`crate::CachingAuthenticator`]).
///
/// Implementations may perform blocking or async network I/O (token
/// exchange, directory lookup); timeouts are the transport's concern, not
/// the pipeline's.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Validates the credentials, returning them with a profile attached.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::CredentialsRejected`] when the credential
    /// is bad, expired or unverifiable. The failure is never retried by the
    /// authenticator itself.
    async fn validate(
        &self,
        credentials: Credentials,
        context: &dyn WebContext,
        session: &dyn SessionStore,
    ) -> AuthResult<Credentials>;
}
