//! Kerberos header extraction.

use async_trait::async_trait;
use base64::Engine;
use gk_core::{
    AuthError, AuthResult, Credentials, CredentialsExtractor, CredentialsKind, SessionStore,
    WebContext,
};

const AUTHORIZATION_HEADER: &str = "Authorization";
const NEGOTIATE_PREFIX: &str = "Negotiate ";
const KERBEROS_PREFIX: &str = "Kerberos ";

/// Extracts Kerberos tickets from the `Authorization` header.
///
/// A missing header, or one carrying a foreign scheme (`Basic`, `Bearer`,
/// ...), does not indicate the Kerberos mechanism yet, so the extractor
/// reports "not applicable" rather than failing. A recognized scheme with
/// an undecodable payload is a malformed credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct KerberosExtractor;

#[async_trait]
impl CredentialsExtractor for KerberosExtractor {
    async fn extract(
        &self,
        context: &dyn WebContext,
        _session: &dyn SessionStore,
    ) -> AuthResult<Option<Credentials>> {
        let Some(header) = context.request_header(AUTHORIZATION_HEADER) else {
            return Ok(None);
        };

        let Some(encoded) = header
            .strip_prefix(NEGOTIATE_PREFIX)
            .or_else(|| header.strip_prefix(KERBEROS_PREFIX))
        else {
            return Ok(None);
        };

        let ticket = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| {
                AuthError::MalformedCredentials(format!("corrupt Kerberos ticket encoding: {e}"))
            })?;
        tracing::debug!(ticket_len = ticket.len(), "Kerberos ticket extracted");

        Ok(Some(Credentials::new(CredentialsKind::Kerberos { ticket })))
    }
}
