//! # gk-saml
//!
//! SAML 2.0 web SSO support for gatekit:
//!
//! - HTTP-POST and HTTP-Redirect binding codecs (base64 / raw DEFLATE)
//! - callback extraction with relay-state verification
//! - assertion validation behind an [`AssertionValidator`] trait
//! - keystore material transport with graceful degradation
//!
//! Cryptographic assertion checking (XML-dsig, conditions) is delegated to
//! the embedder; this crate owns the wire shuffling around it.
//!
//! ```ignore
//! let client = saml2_client("idp", callback_url, configuration, validator)?;
//! let action = client.redirection_action(&context, &session).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod authenticator;
pub mod binding;
pub mod client;
pub mod config;
pub mod error;
pub mod extractor;
pub mod keystore;

pub use authenticator::{AssertionValidator, Saml2Authenticator, ValidatedAssertion};
pub use binding::{redirect_request_url, SamlBinding};
pub use client::{saml2_client, Saml2RedirectionActionBuilder};
pub use config::Saml2Configuration;
pub use error::{SamlError, SamlResult};
pub use extractor::Saml2CredentialsExtractor;
pub use keystore::{keystore_error, load_keystore, persist_keystore, KeystoreOutcome, KeystoreTransport};
