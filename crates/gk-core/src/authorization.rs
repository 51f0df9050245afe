//! Access-control predicates and authorization generators.
//!
//! Authorizers evaluate pure predicates over already-authenticated profiles;
//! they never mutate profiles or reach back to the identity provider.
//! Authorization generators run earlier in the pipeline and enrich a fresh
//! profile with roles or permissions from a source distinct from the
//! identity provider.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::context::{HttpMethod, WebContext};
use crate::error::AuthResult;
use crate::profile::UserProfile;
use crate::session::SessionStore;

/// Sentinel role meaning "any role suffices" in a required-role set.
pub const ANY_ROLE: &str = "*";

/// Pure predicate over one or more authenticated profiles.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Returns whether access is granted for the given profiles.
    async fn is_authorized(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
        profiles: &[UserProfile],
    ) -> AuthResult<bool>;
}

/// Enriches a profile with roles or permissions from an external source.
///
/// Generators are purely additive and may be chained; each receives the
/// output of the previous one. Returning `Ok(None)` leaves the profile
/// unchanged for subsequent stages.
#[async_trait]
pub trait AuthorizationGenerator: Send + Sync {
    /// Produces an updated profile, or `None` to keep the current one.
    async fn generate(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
        profile: &UserProfile,
    ) -> AuthResult<Option<UserProfile>>;
}

/// Grants access iff a profile's roles intersect the required set.
///
/// A profile with zero roles is never authorized, regardless of
/// configuration. An empty required set, or one containing [`ANY_ROLE`],
/// accepts any profile that has at least one role.
#[derive(Debug, Clone, Default)]
pub struct RequireAnyRoleAuthorizer {
    roles: HashSet<String>,
}

impl RequireAnyRoleAuthorizer {
    /// Creates the authorizer from the required role names.
    #[must_use]
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    fn check(&self, profile: &UserProfile) -> bool {
        if profile.roles.is_empty() {
            return false;
        }
        if self.roles.is_empty() || self.roles.contains(ANY_ROLE) {
            return true;
        }
        self.roles.iter().any(|role| profile.has_role(role))
    }
}

#[async_trait]
impl Authorizer for RequireAnyRoleAuthorizer {
    async fn is_authorized(
        &self,
        _context: &dyn WebContext,
        _session: &dyn SessionStore,
        profiles: &[UserProfile],
    ) -> AuthResult<bool> {
        Ok(profiles.iter().any(|profile| self.check(profile)))
    }
}

/// Grants access iff the request's HTTP method is in the allow-set.
#[derive(Debug, Clone)]
pub struct CheckHttpMethodAuthorizer {
    methods: HashSet<HttpMethod>,
}

impl CheckHttpMethodAuthorizer {
    /// Creates the authorizer from the allowed methods.
    #[must_use]
    pub fn new<I>(methods: I) -> Self
    where
        I: IntoIterator<Item = HttpMethod>,
    {
        Self {
            methods: methods.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Authorizer for CheckHttpMethodAuthorizer {
    async fn is_authorized(
        &self,
        context: &dyn WebContext,
        _session: &dyn SessionStore,
        _profiles: &[UserProfile],
    ) -> AuthResult<bool> {
        Ok(self.methods.contains(&context.request_method()))
    }
}

/// Grants access iff every inner authorizer grants it.
#[derive(Default)]
pub struct AndAuthorizer {
    authorizers: Vec<Box<dyn Authorizer>>,
}

impl AndAuthorizer {
    /// Creates an empty conjunction (which authorizes everything).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an authorizer to the conjunction.
    #[must_use]
    pub fn and(mut self, authorizer: Box<dyn Authorizer>) -> Self {
        self.authorizers.push(authorizer);
        self
    }
}

#[async_trait]
impl Authorizer for AndAuthorizer {
    async fn is_authorized(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
        profiles: &[UserProfile],
    ) -> AuthResult<bool> {
        for authorizer in &self.authorizers {
            if !authorizer.is_authorized(context, session, profiles).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Grants access iff at least one inner authorizer grants it.
#[derive(Default)]
pub struct OrAuthorizer {
    authorizers: Vec<Box<dyn Authorizer>>,
}

impl OrAuthorizer {
    /// Creates an empty disjunction (which denies everything).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an authorizer to the disjunction.
    #[must_use]
    pub fn or(mut self, authorizer: Box<dyn Authorizer>) -> Self {
        self.authorizers.push(authorizer);
        self
    }
}

#[async_trait]
impl Authorizer for OrAuthorizer {
    async fn is_authorized(
        &self,
        context: &dyn WebContext,
        session: &dyn SessionStore,
        profiles: &[UserProfile],
    ) -> AuthResult<bool> {
        for authorizer in &self.authorizers {
            if authorizer.is_authorized(context, session, profiles).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MockWebContext;
    use crate::session::InMemorySessionStore;

    fn profile_with_roles(roles: &[&str]) -> UserProfile {
        let mut profile = UserProfile::new("u");
        for role in roles {
            profile.add_role(*role);
        }
        profile
    }

    #[tokio::test]
    async fn role_membership() {
        let context = MockWebContext::new();
        let store = InMemorySessionStore::new();
        let authorizer = RequireAnyRoleAuthorizer::new(["admin", "operator"]);

        let admin = [profile_with_roles(&["admin"])];
        let user = [profile_with_roles(&["user"])];

        assert!(authorizer.is_authorized(&context, &store, &admin).await.unwrap());
        assert!(!authorizer.is_authorized(&context, &store, &user).await.unwrap());
    }

    #[tokio::test]
    async fn zero_role_profile_never_authorized_by_wildcard() {
        let context = MockWebContext::new();
        let store = InMemorySessionStore::new();
        let no_roles = [profile_with_roles(&[])];

        let wildcard = RequireAnyRoleAuthorizer::new([ANY_ROLE]);
        assert!(!wildcard.is_authorized(&context, &store, &no_roles).await.unwrap());

        let empty = RequireAnyRoleAuthorizer::new(Vec::<String>::new());
        assert!(!empty.is_authorized(&context, &store, &no_roles).await.unwrap());

        // But a profile with any role at all passes both policies.
        let any = [profile_with_roles(&["whatever"])];
        assert!(wildcard.is_authorized(&context, &store, &any).await.unwrap());
        assert!(empty.is_authorized(&context, &store, &any).await.unwrap());
    }

    #[tokio::test]
    async fn no_profiles_means_no_access() {
        let context = MockWebContext::new();
        let store = InMemorySessionStore::new();
        let authorizer = RequireAnyRoleAuthorizer::new([ANY_ROLE]);
        assert!(!authorizer.is_authorized(&context, &store, &[]).await.unwrap());
    }

    #[tokio::test]
    async fn good_http_method() {
        let store = InMemorySessionStore::new();
        let profiles = [UserProfile::new("u")];
        let authorizer = CheckHttpMethodAuthorizer::new([HttpMethod::Get, HttpMethod::Post]);

        let get = MockWebContext::new().with_method(HttpMethod::Get);
        assert!(authorizer.is_authorized(&get, &store, &profiles).await.unwrap());
    }

    #[tokio::test]
    async fn bad_http_method() {
        let store = InMemorySessionStore::new();
        let profiles = [UserProfile::new("u")];
        let authorizer = CheckHttpMethodAuthorizer::new([HttpMethod::Put]);

        let delete = MockWebContext::new().with_method(HttpMethod::Delete);
        assert!(!authorizer.is_authorized(&delete, &store, &profiles).await.unwrap());
    }

    #[tokio::test]
    async fn boolean_combinators() {
        let store = InMemorySessionStore::new();
        let context = MockWebContext::new().with_method(HttpMethod::Get);
        let profiles = [profile_with_roles(&["user"])];

        let both = AndAuthorizer::new()
            .and(Box::new(RequireAnyRoleAuthorizer::new(["user"])))
            .and(Box::new(CheckHttpMethodAuthorizer::new([HttpMethod::Get])));
        assert!(both.is_authorized(&context, &store, &profiles).await.unwrap());

        let strict = AndAuthorizer::new()
            .and(Box::new(RequireAnyRoleAuthorizer::new(["admin"])))
            .and(Box::new(CheckHttpMethodAuthorizer::new([HttpMethod::Get])));
        assert!(!strict.is_authorized(&context, &store, &profiles).await.unwrap());

        let either = OrAuthorizer::new()
            .or(Box::new(RequireAnyRoleAuthorizer::new(["admin"])))
            .or(Box::new(CheckHttpMethodAuthorizer::new([HttpMethod::Get])));
        assert!(either.is_authorized(&context, &store, &profiles).await.unwrap());

        assert!(!OrAuthorizer::new().is_authorized(&context, &store, &profiles).await.unwrap());
    }
}
