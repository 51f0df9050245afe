//! # gk-core
//!
//! Core contracts and pipeline for the gatekit authentication framework.
//!
//! This crate defines the protocol-agnostic pieces of a redirect-based
//! ("indirect") login pipeline: credential extraction, validation,
//! profile creation, authorization generation and access-control checks,
//! orchestrated by an [`IndirectClient`].
//!
//! ## Building blocks
//!
//! - [`WebContext`] - inbound request abstraction (headers, parameters, method)
//! - [`SessionStore`] - per-user-agent key/value storage across the redirect hop
//! - [`CredentialsExtractor`] - pulls protocol credentials out of a request
//! - [`Authenticator`] - validates credentials and attaches a profile
//! - [`CachingAuthenticator`] - TTL cache decorator over any authenticator
//! - [`ProfileCreator`] - builds the normalized [`UserProfile`]
//! - [`AuthorizationGenerator`] - enriches profiles with roles/permissions
//! - [`Authorizer`] - access-control predicates over authenticated profiles
//! - [`IndirectClient`] - the redirect/callback state machine tying it together
//!
//! ## Example
//!
//! ```ignore
//! use gk_core::{IndirectClient, InMemorySessionStore};
//!
//! let client: IndirectClient = build_oauth_client();
//! let session = InMemorySessionStore::new();
//!
//! // 1. Send the user-agent to the provider.
//! let action = client.redirection_action(&context, &session).await?;
//!
//! // 2. Later, consume the callback request.
//! if let Some(profile) = client.callback(&callback_context, &session).await? {
//!     println!("authenticated as {}", profile.id);
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod authenticator;
pub mod authorization;
pub mod caching;
pub mod client;
pub mod context;
pub mod credentials;
pub mod error;
pub mod extractor;
pub mod flow;
pub mod generator;
pub mod profile;
pub mod redirect;
pub mod session;

pub use authenticator::Authenticator;
pub use authorization::{
    AndAuthorizer, AuthorizationGenerator, Authorizer, CheckHttpMethodAuthorizer, OrAuthorizer,
    RequireAnyRoleAuthorizer, ANY_ROLE,
};
pub use caching::CachingAuthenticator;
pub use client::{merge_client_name, IndirectClient, IndirectClientBuilder, RedirectionActionBuilder};
pub use context::{HttpMethod, MockWebContext, WebContext};
pub use credentials::{Credentials, CredentialsKind, OAuth10RequestToken};
pub use error::{AuthError, AuthResult};
pub use extractor::{CredentialsExtractor, ExtractorChain};
pub use flow::{states, CallbackFlow};
pub use generator::{RandomValueGenerator, StaticValueGenerator, ValueGenerator};
pub use profile::{AttachedProfileCreator, ProfileCreator, UserProfile};
pub use redirect::RedirectAction;
pub use session::{InMemorySessionStore, SessionStore};
