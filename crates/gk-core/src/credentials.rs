//! Credential bundles and their protocol-defined identity.
//!
//! A [`Credentials`] value is the opaque bundle an extractor pulls out of a
//! request. Its identity (equality and hashing) is defined per protocol and
//! is what keys the authenticator cache; the attached profile never takes
//! part in it. Attaching a resolved profile after validation is the only
//! permitted mutation.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;

/// An OAuth 1.0a request token obtained during the first leg of the
/// three-legged dance and parked in the session until the callback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OAuth10RequestToken {
    /// The temporary token value.
    pub token: String,
    /// The token secret needed for the access-token exchange.
    pub secret: String,
}

/// The protocol-specific identity of a credential bundle.
///
/// Equality and hashing implement the per-protocol identity relation:
/// username/password credentials are equal iff both fields match, OAuth 1.0
/// credentials are equal iff token and verifier match (the parked request
/// token is carried along but does not contribute), and so on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CredentialsKind {
    /// A username/password pair, e.g. for a form or directory login.
    UsernamePassword {
        /// The username.
        username: String,
        /// The password.
        password: String,
    },
    /// OAuth 1.0a callback credentials.
    OAuth10 {
        /// The request token stored before the redirect, if still available.
        request_token: Option<OAuth10RequestToken>,
        /// The `oauth_token` callback parameter.
        token: String,
        /// The `oauth_verifier` callback parameter.
        verifier: String,
    },
    /// OAuth 2.0 authorization code.
    OAuth20 {
        /// The `code` callback parameter.
        code: String,
    },
    /// A raw Kerberos/SPNEGO ticket decoded from the `Authorization` header.
    Kerberos {
        /// The decoded ticket bytes.
        ticket: Vec<u8>,
    },
    /// A SAML-style assertion response.
    SamlAssertion {
        /// The decoded assertion XML.
        response: String,
        /// The relay state echoed by the provider, if any.
        relay_state: Option<String>,
    },
}

impl PartialEq for CredentialsKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::UsernamePassword {
                    username: u1,
                    password: p1,
                },
                Self::UsernamePassword {
                    username: u2,
                    password: p2,
                },
            ) => u1 == u2 && p1 == p2,
            (
                Self::OAuth10 {
                    token: t1,
                    verifier: v1,
                    ..
                },
                Self::OAuth10 {
                    token: t2,
                    verifier: v2,
                    ..
                },
            ) => t1 == t2 && v1 == v2,
            (Self::OAuth20 { code: c1 }, Self::OAuth20 { code: c2 }) => c1 == c2,
            (Self::Kerberos { ticket: t1 }, Self::Kerberos { ticket: t2 }) => t1 == t2,
            (
                Self::SamlAssertion {
                    response: r1,
                    relay_state: s1,
                },
                Self::SamlAssertion {
                    response: r2,
                    relay_state: s2,
                },
            ) => r1 == r2 && s1 == s2,
            _ => false,
        }
    }
}

impl Eq for CredentialsKind {}

impl Hash for CredentialsKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::UsernamePassword { username, password } => {
                0u8.hash(state);
                username.hash(state);
                password.hash(state);
            }
            Self::OAuth10 {
                token, verifier, ..
            } => {
                1u8.hash(state);
                token.hash(state);
                verifier.hash(state);
            }
            Self::OAuth20 { code } => {
                2u8.hash(state);
                code.hash(state);
            }
            Self::Kerberos { ticket } => {
                3u8.hash(state);
                ticket.hash(state);
            }
            Self::SamlAssertion {
                response,
                relay_state,
            } => {
                4u8.hash(state);
                response.hash(state);
                relay_state.hash(state);
            }
        }
    }
}

/// A credential bundle flowing through the pipeline.
///
/// Created per inbound request by an extractor, consumed by an
/// authenticator, and discarded afterwards unless cached.
#[derive(Debug, Clone)]
pub struct Credentials {
    kind: CredentialsKind,
    profile: Option<UserProfile>,
}

impl Credentials {
    /// Wraps a protocol-specific identity into a fresh bundle.
    #[must_use]
    pub const fn new(kind: CredentialsKind) -> Self {
        Self {
            kind,
            profile: None,
        }
    }

    /// Convenience constructor for username/password credentials.
    #[must_use]
    pub fn username_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(CredentialsKind::UsernamePassword {
            username: username.into(),
            password: password.into(),
        })
    }

    /// Returns the protocol-specific identity.
    #[must_use]
    pub const fn kind(&self) -> &CredentialsKind {
        &self.kind
    }

    /// Returns the resolved profile, if validation has attached one.
    #[must_use]
    pub const fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Attaches the resolved profile after a successful validation.
    #[must_use]
    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Consumes the bundle, yielding the attached profile if any.
    #[must_use]
    pub fn into_profile(self) -> Option<UserProfile> {
        self.profile
    }
}

impl PartialEq for Credentials {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Credentials {}

impl Hash for Credentials {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}
