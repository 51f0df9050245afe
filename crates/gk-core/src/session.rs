//! Session store contract and in-memory implementation.
//!
//! Handshake state (anti-CSRF tokens, OAuth 1.0 request tokens) must survive
//! the redirect round trip through storage scoped to the user-agent session.
//! Keys written by the framework are prefixed with the owning client's name,
//! so several configured clients of the same protocol do not collide.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::context::WebContext;
use crate::error::AuthResult;

/// Per-user-agent key/value persistence across the redirect hop.
///
/// Implementations may be backed by server-side sessions, cookies or a
/// distributed cache. The store does not enforce read-once semantics;
/// clearing consumed handshake state is the caller's responsibility.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Gets a value from the session bound to the request, if present.
    async fn get(&self, context: &dyn WebContext, key: &str) -> AuthResult<Option<Value>>;

    /// Sets a value in the session bound to the request.
    async fn set(&self, context: &dyn WebContext, key: &str, value: Value) -> AuthResult<()>;

    /// Removes a value from the session bound to the request.
    ///
    /// Removing an absent key is not an error.
    async fn remove(&self, context: &dyn WebContext, key: &str) -> AuthResult<()>;
}

/// Thread-safe in-memory [`SessionStore`], keyed by session id.
///
/// Suitable for tests and single-process embedders.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: DashMap<(String, String), Value>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, context: &dyn WebContext, key: &str) -> AuthResult<Option<Value>> {
        let entry = self
            .entries
            .get(&(context.session_id(), key.to_string()))
            .map(|v| v.clone());
        Ok(entry)
    }

    async fn set(&self, context: &dyn WebContext, key: &str, value: Value) -> AuthResult<()> {
        self.entries
            .insert((context.session_id(), key.to_string()), value);
        Ok(())
    }

    async fn remove(&self, context: &dyn WebContext, key: &str) -> AuthResult<()> {
        self.entries
            .remove(&(context.session_id(), key.to_string()));
        Ok(())
    }
}
