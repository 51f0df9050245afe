//! # gk-kerberos
//!
//! Kerberos/SPNEGO header extraction for gatekit.
//!
//! Pulls raw ticket bytes out of `Authorization: Negotiate <base64>` and
//! `Authorization: Kerberos <base64>` headers. Validating the ticket is
//! delegated to a [`TicketValidator`] supplied by the embedder; decoding
//! the ticket's ASN.1 internals is out of scope here.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod authenticator;
pub mod extractor;

pub use authenticator::{KerberosAuthenticator, TicketValidator, ValidatedTicket};
pub use extractor::KerberosExtractor;
