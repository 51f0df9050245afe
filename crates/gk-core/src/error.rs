//! Error types for the authentication pipeline.
//!
//! "Not applicable" is deliberately not an error: extractors signal it by
//! returning `Ok(None)` so that several extractors can be tried in sequence.
//! Everything here is a hard failure that propagates to the caller and is
//! never retried inside the pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Hard failures raised by the authentication pipeline.
///
/// The variants map onto the failure categories embedding applications need
/// to distinguish: a malformed payload, a rejected credential, a broken
/// handshake, an unparsable provider response, a transport problem, or a
/// framework misconfiguration.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A protocol marker was present but the payload was structurally invalid
    /// (missing callback parameter, corrupt encoding).
    #[error("malformed credentials: {0}")]
    MalformedCredentials(String),

    /// The credential was well-formed but rejected during validation
    /// (expired/invalid token, directory rejection).
    #[error("credentials rejected: {0}")]
    CredentialsRejected(String),

    /// The callback's anti-CSRF state does not match the persisted handshake
    /// state. Possible CSRF attempt; never treated as "not applicable".
    #[error("handshake state mismatch for client {client}")]
    StateMismatch {
        /// Name of the client whose handshake state failed verification.
        client: String,
    },

    /// The credential validated but the provider response could not be turned
    /// into a user profile.
    #[error("profile creation failed: {0}")]
    ProfileCreation(String),

    /// A protocol-specific I/O operation failed in transit.
    #[error("transport failure during {operation} against {target}: {message}")]
    Transport {
        /// The operation that was being performed.
        operation: String,
        /// The remote target of the operation.
        target: String,
        /// Underlying failure description.
        message: String,
    },

    /// The session store could not be read or written.
    #[error("session store error: {0}")]
    Session(String),

    /// The client or one of its components is misconfigured.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl AuthError {
    /// Returns whether this error means the credential itself was bad,
    /// as opposed to an infrastructure problem.
    #[must_use]
    pub const fn is_credential_rejection(&self) -> bool {
        matches!(
            self,
            Self::MalformedCredentials(_) | Self::CredentialsRejected(_) | Self::StateMismatch { .. }
        )
    }

    /// Returns whether this error originated outside the pipeline
    /// (transport or session store).
    #[must_use]
    pub const fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Session(_))
    }
}
