//! # gk-oauth
//!
//! OAuth 1.0a and OAuth 2.0 protocol support for gatekit.
//!
//! Implements the redirect-based credential handshake for both flavors:
//! the OAuth 2.0 state+code dance and the OAuth 1.0a three-legged
//! request-token dance. The actual token-endpoint I/O is performed through
//! the [`OAuthProvider`] trait supplied by the embedder, and mapping the
//! provider's raw profile JSON into named attributes goes through
//! [`ProfileDefinition`].
//!
//! ## Example
//!
//! ```ignore
//! use gk_oauth::{oauth20_client, OAuth20Configuration};
//!
//! let config = OAuth20Configuration::new(
//!     "my-app-id",
//!     "my-app-secret",
//!     "https://provider.example.com/oauth/authorize",
//! );
//! let client = oauth20_client(
//!     "provider",
//!     "https://app.example.com/callback",
//!     config,
//!     provider_transport,
//!     Box::new(BasicProfileDefinition::default()),
//! )?;
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod client;
pub mod config;
pub mod extractor;
pub mod profile;
pub mod provider;

pub use client::{
    oauth10_client, oauth20_client, OAuth10RedirectionActionBuilder,
    OAuth20RedirectionActionBuilder,
};
pub use config::{
    OAuth10Configuration, OAuth20Configuration, OAUTH_CODE, OAUTH_TOKEN, OAUTH_VERIFIER,
    STATE_PARAMETER,
};
pub use extractor::{OAuth10CredentialsExtractor, OAuth20CredentialsExtractor};
pub use profile::{BasicProfileDefinition, OAuth10ProfileCreator, OAuth20ProfileCreator, ProfileDefinition};
pub use provider::{OAuthAccessToken, OAuthProvider};
