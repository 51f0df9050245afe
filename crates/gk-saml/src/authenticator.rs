//! Assertion validation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use gk_core::{
    AuthError, AuthResult, Authenticator, Credentials, CredentialsKind, SessionStore,
    UserProfile, WebContext,
};
use serde_json::Value;

/// Outcome of a successful assertion validation.
#[derive(Debug, Clone)]
pub struct ValidatedAssertion {
    /// The subject NameID.
    pub name_id: String,
    /// Attribute statements lifted from the assertion.
    pub attributes: HashMap<String, Value>,
}

/// Validates a SAML response document.
///
/// Signature verification, condition checking and attribute extraction are
/// the embedder's concern; implementations typically wrap an XML-dsig
/// library.
#[async_trait]
pub trait AssertionValidator: Send + Sync {
    /// Validates the response XML and returns the asserted subject.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CredentialsRejected`] for an invalid, expired
    /// or unsigned assertion.
    async fn validate(&self, response_xml: &str) -> AuthResult<ValidatedAssertion>;
}

/// [`Authenticator`] for SAML assertion credentials.
///
/// Attaches a profile built from the validated NameID and attribute
/// statements.
pub struct Saml2Authenticator {
    validator: Arc<dyn AssertionValidator>,
}

impl Saml2Authenticator {
    /// Creates the authenticator over the given validator.
    #[must_use]
    pub fn new(validator: Arc<dyn AssertionValidator>) -> Self {
        Self { validator }
    }
}

#[async_trait]
impl Authenticator for Saml2Authenticator {
    async fn validate(
        &self,
        credentials: Credentials,
        _context: &dyn WebContext,
        _session: &dyn SessionStore,
    ) -> AuthResult<Credentials> {
        let CredentialsKind::SamlAssertion { response, .. } = credentials.kind() else {
            return Err(AuthError::CredentialsRejected(
                "not SAML credentials".to_string(),
            ));
        };
        let assertion = self.validator.validate(response).await?;
        tracing::debug!(name_id = %assertion.name_id, "assertion validated");

        let mut profile = UserProfile::new(assertion.name_id);
        for (name, value) in assertion.attributes {
            profile.add_attribute(name, value);
        }
        Ok(credentials.with_profile(profile))
    }
}
