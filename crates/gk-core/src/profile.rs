//! Normalized user profiles and profile creation.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::WebContext;
use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};
use crate::session::SessionStore;

/// Provider-agnostic representation of an authenticated identity.
///
/// Built once by a [`ProfileCreator`], optionally enriched by authorization
/// generators, then handed to the embedding application. The identity (`id`)
/// is fixed at creation; attributes, roles and permissions may be enriched
/// before the profile is released.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    /// The unique identifier of the user at the identity provider.
    pub id: String,
    /// Named profile attributes (display name, email, ...).
    pub attributes: HashMap<String, Value>,
    /// Role names granted to the user.
    pub roles: HashSet<String>,
    /// Permission names granted to the user.
    pub permissions: HashSet<String>,
    /// Name of the client that authenticated this profile.
    pub client_name: Option<String>,
}

impl UserProfile {
    /// Creates a profile with the given identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Adds a named attribute.
    pub fn add_attribute(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), value);
    }

    /// Returns a named attribute, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Grants a role.
    pub fn add_role(&mut self, role: impl Into<String>) {
        self.roles.insert(role.into());
    }

    /// Grants a permission.
    pub fn add_permission(&mut self, permission: impl Into<String>) {
        self.permissions.insert(permission.into());
    }

    /// Returns whether the profile holds the given role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Builds the final [`UserProfile`] from validated credentials.
///
/// For protocols where validation and profile assembly are the same network
/// round trip (OAuth), the creator receives the raw extracted credentials
/// and performs the exchange itself. The creator performs no caching of its
/// own; caching, if desired, is layered at the authenticator level.
#[async_trait]
pub trait ProfileCreator: Send + Sync {
    /// Creates a profile from the given credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ProfileCreation`] when the provider response
    /// cannot be parsed into a profile.
    async fn create(
        &self,
        credentials: &Credentials,
        context: &dyn WebContext,
        session: &dyn SessionStore,
    ) -> AuthResult<UserProfile>;
}

/// Profile creator that reads the profile an authenticator already attached
/// to the credentials.
///
/// This is the default for protocols whose authenticator resolves the
/// identity as part of validation (Kerberos, SAML, username/password).
#[derive(Debug, Clone, Copy, Default)]
pub struct AttachedProfileCreator;

#[async_trait]
impl ProfileCreator for AttachedProfileCreator {
    async fn create(
        &self,
        credentials: &Credentials,
        _context: &dyn WebContext,
        _session: &dyn SessionStore,
    ) -> AuthResult<UserProfile> {
        credentials.profile().cloned().ok_or_else(|| {
            AuthError::ProfileCreation("no profile attached to validated credentials".to_string())
        })
    }
}
