//! Keystore material transport.
//!
//! Service-provider signing material can live behind an external store
//! (an HTTP endpoint, a vault, a file share). Some deployments are
//! read-only or not provisioned at all; those transports answer
//! [`KeystoreOutcome::NotSupported`] and the pipeline carries on without
//! them instead of failing the login flow.

use async_trait::async_trait;
use gk_core::{AuthError, AuthResult};

/// Result of a keystore transport operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeystoreOutcome<T = ()> {
    /// The operation took effect, carrying its payload.
    Applied(T),
    /// The backing store does not support this operation.
    NotSupported,
}

/// Moves keystore material to and from an external store.
#[async_trait]
pub trait KeystoreTransport: Send + Sync {
    /// The store location, used in error and log messages.
    fn target(&self) -> &str;

    /// Fetches the current keystore material.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Transport`] when the store is reachable but
    /// the operation fails.
    async fn fetch(&self) -> AuthResult<KeystoreOutcome<Vec<u8>>>;

    /// Stores new keystore material.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Transport`] when the store is reachable but
    /// the operation fails.
    async fn store(&self, material: &[u8]) -> AuthResult<KeystoreOutcome>;
}

/// Loads keystore material, treating an unsupported store as absent.
///
/// # Errors
///
/// Propagates transport failures.
pub async fn load_keystore(transport: &dyn KeystoreTransport) -> AuthResult<Option<Vec<u8>>> {
    match transport.fetch().await? {
        KeystoreOutcome::Applied(material) => Ok(Some(material)),
        KeystoreOutcome::NotSupported => {
            tracing::warn!(target_url = %transport.target(), "keystore fetch not supported, skipping");
            Ok(None)
        }
    }
}

/// Persists keystore material, treating an unsupported store as a no-op.
///
/// # Errors
///
/// Propagates transport failures.
pub async fn persist_keystore(
    transport: &dyn KeystoreTransport,
    material: &[u8],
) -> AuthResult<()> {
    match transport.store(material).await? {
        KeystoreOutcome::Applied(()) => {
            tracing::debug!(target_url = %transport.target(), "keystore material persisted");
            Ok(())
        }
        KeystoreOutcome::NotSupported => {
            tracing::warn!(target_url = %transport.target(), "keystore store not supported, skipping");
            Ok(())
        }
    }
}

/// Builds the transport error for a failed keystore operation.
#[must_use]
pub fn keystore_error(operation: &str, target: &str, message: impl Into<String>) -> AuthError {
    AuthError::Transport {
        operation: operation.to_string(),
        target: target.to_string(),
        message: message.into(),
    }
}
