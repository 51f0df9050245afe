//! Credential extraction from inbound requests.

use async_trait::async_trait;

use crate::context::WebContext;
use crate::credentials::Credentials;
use crate::error::AuthResult;
use crate::session::SessionStore;

/// Pulls a protocol-specific credential bundle out of an inbound request.
///
/// No validation happens here. `Ok(None)` means the request simply does not
/// carry this protocol's marker (e.g. a foreign `Authorization` scheme) and
/// lets the caller try another extractor. An error means the marker was
/// present but the payload was structurally invalid, which is a hard
/// failure, never silently skipped.
#[async_trait]
pub trait CredentialsExtractor: Send + Sync {
    /// Extracts credentials from the request, if applicable.
    ///
    /// Implementations may read (but must not require) session state, e.g.
    /// a previously stored request token needed to decode the callback.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::MalformedCredentials`] when the protocol
    /// marker is present but the payload is structurally invalid.
    async fn extract(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
    ) -> AuthResult<Option<Credentials>>;
}

/// Tries several extractors in order, returning the first applicable result.
///
/// Hard failures from any extractor propagate immediately; only the
/// "not applicable" outcome moves on to the next extractor.
#[derive(Default)]
pub struct ExtractorChain {
    extractors: Vec<Box<dyn CredentialsExtractor>>,
}

impl ExtractorChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an extractor to the chain.
    #[must_use]
    pub fn with(mut self, extractor: Box<dyn CredentialsExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }
}

#[async_trait]
impl CredentialsExtractor for ExtractorChain {
    async fn extract(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
    ) -> AuthResult<Option<Credentials>> {
        for extractor in &self.extractors {
            if let Some(credentials) = extractor.extract(context, session).await? {
                return Ok(Some(credentials));
            }
        }
        Ok(None)
    }
}
