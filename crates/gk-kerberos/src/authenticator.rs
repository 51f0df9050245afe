//! Kerberos ticket validation.

use std::sync::Arc;

use async_trait::async_trait;
use gk_core::{
    AuthError, AuthResult, Authenticator, Credentials, CredentialsKind, SessionStore,
    UserProfile, WebContext,
};

/// Outcome of a successful ticket validation.
#[derive(Debug, Clone)]
pub struct ValidatedTicket {
    /// The authenticated principal (e.g. `jdoe@EXAMPLE.COM`).
    pub principal: String,
}

/// Validates raw Kerberos ticket bytes against a KDC or keytab.
///
/// The cryptographic work lives outside the pipeline; embedders implement
/// this over their GSSAPI/SPNEGO library of choice.
#[async_trait]
pub trait TicketValidator: Send + Sync {
    /// Validates the ticket, returning the authenticated principal.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CredentialsRejected`] for an expired or
    /// unverifiable ticket.
    async fn validate_ticket(&self, ticket: &[u8]) -> AuthResult<ValidatedTicket>;
}

/// [`Authenticator`] for Kerberos credentials.
///
/// Attaches a profile whose id is the validated principal. Validation can
/// involve a KDC round trip, which makes this authenticator a natural
/// candidate for the caching decorator.
pub struct KerberosAuthenticator {
    validator: Arc<dyn TicketValidator>,
}

impl KerberosAuthenticator {
    /// Creates the authenticator over the given validator.
    #[must_use]
    pub fn new(validator: Arc<dyn TicketValidator>) -> Self {
        Self { validator }
    }
}

#[async_trait]
impl Authenticator for KerberosAuthenticator {
    async fn validate(
        &self,
        credentials: Credentials,
        _context: &dyn WebContext,
        _session: &dyn SessionStore,
    ) -> AuthResult<Credentials> {
        let CredentialsKind::Kerberos { ticket } = credentials.kind() else {
            return Err(AuthError::CredentialsRejected(
                "not Kerberos credentials".to_string(),
            ));
        };
        let validated = self.validator.validate_ticket(ticket).await?;
        tracing::debug!(principal = %validated.principal, "ticket validated");
        Ok(credentials.with_profile(UserProfile::new(validated.principal)))
    }
}
