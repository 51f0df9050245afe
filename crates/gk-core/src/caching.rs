//! TTL caching decorator over any [`Authenticator`].
//!
//! Wraps a possibly expensive or call-limited delegate so that a credential
//! identity is validated at most once while its cached result is live.
//! Entries expire lazily: an entry past its time-to-live is treated as
//! absent on every read, even if the map still physically holds it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::authenticator::Authenticator;
use crate::context::WebContext;
use crate::credentials::{Credentials, CredentialsKind};
use crate::error::AuthResult;
use crate::session::SessionStore;

struct CacheEntry {
    credentials: Credentials,
    refreshed_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.refreshed_at.elapsed() < ttl
    }
}

/// Caching decorator guaranteeing at most one delegate call per live
/// credential identity.
///
/// The delegate can be swapped at runtime with [`set_delegate`]; the swap
/// takes effect on the next cache miss and does not invalidate existing
/// entries. Failed validations are propagated verbatim and never cached.
///
/// Concurrent misses for the same identity may each invoke the delegate;
/// the design claims at-most-one only for identities already cached.
///
/// [`set_delegate`]: CachingAuthenticator::set_delegate
pub struct CachingAuthenticator {
    delegate: RwLock<Arc<dyn Authenticator>>,
    cache: DashMap<CredentialsKind, CacheEntry>,
    ttl: Duration,
    max_size: usize,
}

impl CachingAuthenticator {
    /// Wraps `delegate` with a cache holding entries for `ttl`.
    ///
    /// `max_size` is a size hint, not a hard cap: when an insert finds the
    /// map at or above the hint, expired entries are swept first.
    #[must_use]
    pub fn new(delegate: Arc<dyn Authenticator>, max_size: usize, ttl: Duration) -> Self {
        Self {
            delegate: RwLock::new(delegate),
            cache: DashMap::new(),
            ttl,
            max_size,
        }
    }

    /// Swaps the inner authenticator.
    ///
    /// Visible to validations starting after this call returns; cached hits
    /// keep short-circuiting until their entries expire or are removed.
    pub fn set_delegate(&self, delegate: Arc<dyn Authenticator>) {
        *self.delegate.write() = delegate;
    }

    /// Returns whether a non-expired entry exists for the credential's
    /// identity.
    #[must_use]
    pub fn is_cached(&self, credentials: &Credentials) -> bool {
        self.cache
            .get(credentials.kind())
            .is_some_and(|entry| entry.is_fresh(self.ttl))
    }

    /// Unconditionally evicts any entry for the credential's identity.
    ///
    /// The next validation for this identity is a guaranteed miss.
    pub fn remove_from_cache(&self, credentials: &Credentials) {
        self.cache.remove(credentials.kind());
    }

    /// Number of entries physically held, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns whether the cache holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn sweep_expired(&self) {
        self.cache.retain(|_, entry| entry.is_fresh(self.ttl));
    }
}

#[async_trait]
impl Authenticator for CachingAuthenticator {
    async fn validate(
        &self,
        credentials: Credentials,
        context: &dyn WebContext,
        session: &dyn SessionStore,
    ) -> AuthResult<Credentials> {
        if let Some(entry) = self.cache.get(credentials.kind()) {
            if entry.is_fresh(self.ttl) {
                tracing::debug!("cache hit, delegate not invoked");
                return Ok(entry.credentials.clone());
            }
        }

        // Clone the current delegate out so neither the map shard nor the
        // delegate lock is held across the await point.
        let delegate = Arc::clone(&self.delegate.read());
        let validated = delegate.validate(credentials, context, session).await?;

        if self.cache.len() >= self.max_size {
            self.sweep_expired();
        }
        tracing::debug!("cache miss, caching successful validation");
        self.cache.insert(
            validated.kind().clone(),
            CacheEntry {
                credentials: validated.clone(),
                refreshed_at: Instant::now(),
            },
        );
        Ok(validated)
    }
}
