//! SAML binding error types.

use gk_core::AuthError;
use thiserror::Error;

/// Errors raised while encoding or decoding SAML binding payloads.
#[derive(Debug, Error)]
pub enum SamlError {
    /// The message payload is not valid base64.
    #[error("base64 decode error: {0}")]
    Base64Decode(String),

    /// DEFLATE compression or decompression failed.
    #[error("DEFLATE error: {0}")]
    Deflate(String),

    /// The decoded bytes are not a valid UTF-8 XML document.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

/// Result alias for binding codec operations.
pub type SamlResult<T> = Result<T, SamlError>;

impl From<SamlError> for AuthError {
    fn from(err: SamlError) -> Self {
        AuthError::MalformedCredentials(err.to_string())
    }
}
