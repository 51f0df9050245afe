//! SAML 2.0 web SSO binding codecs.
//!
//! Two bindings carry messages between the service provider and the
//! identity provider:
//!
//! - HTTP-POST: the XML travels base64-encoded in a form parameter.
//! - HTTP-Redirect: the XML is raw-DEFLATE compressed, base64-encoded and
//!   URL-encoded into a query parameter.

use std::io::{Read, Write};

use base64::Engine;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::{SamlError, SamlResult};

/// Form/query parameter carrying the identity provider's response.
pub const SAML_RESPONSE_PARAMETER: &str = "SAMLResponse";
/// Form/query parameter carrying the service provider's request.
pub const SAML_REQUEST_PARAMETER: &str = "SAMLRequest";
/// Parameter echoing the relay state across the round trip.
pub const RELAY_STATE_PARAMETER: &str = "RelayState";

/// Which binding a client expects callback messages on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamlBinding {
    /// HTTP-POST binding (base64 only).
    Post,
    /// HTTP-Redirect binding (DEFLATE + base64).
    Redirect,
}

impl SamlBinding {
    /// Decodes a received message payload into its XML text.
    ///
    /// # Errors
    ///
    /// Returns a codec error for undecodable base64, broken DEFLATE data
    /// or non-UTF-8 content.
    pub fn decode(self, encoded: &str) -> SamlResult<String> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| SamlError::Base64Decode(e.to_string()))?;
        let xml_bytes = match self {
            Self::Post => bytes,
            Self::Redirect => inflate(&bytes)?,
        };
        String::from_utf8(xml_bytes)
            .map_err(|e| SamlError::InvalidMessage(format!("message is not UTF-8: {e}")))
    }

    /// Encodes an XML message into the payload form this binding carries.
    ///
    /// # Errors
    ///
    /// Returns a codec error when compression fails.
    pub fn encode(self, xml: &str) -> SamlResult<String> {
        let bytes = match self {
            Self::Post => xml.as_bytes().to_vec(),
            Self::Redirect => deflate(xml.as_bytes())?,
        };
        Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
    }
}

/// Builds the HTTP-Redirect binding URL for an outgoing request.
///
/// # Errors
///
/// Returns a codec error when compression fails.
pub fn redirect_request_url(
    xml: &str,
    destination: &str,
    relay_state: Option<&str>,
) -> SamlResult<String> {
    let encoded = SamlBinding::Redirect.encode(xml)?;
    let separator = if destination.contains('?') { '&' } else { '?' };
    let mut url = format!(
        "{destination}{separator}{SAML_REQUEST_PARAMETER}={}",
        urlencoding::encode(&encoded)
    );
    if let Some(state) = relay_state {
        url.push_str(&format!(
            "&{RELAY_STATE_PARAMETER}={}",
            urlencoding::encode(state)
        ));
    }
    Ok(url)
}

// Raw DEFLATE, no zlib header, per the HTTP-Redirect binding spec.
fn deflate(data: &[u8]) -> SamlResult<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| SamlError::Deflate(format!("compression error: {e}")))?;
    encoder
        .finish()
        .map_err(|e| SamlError::Deflate(format!("compression finish error: {e}")))
}

fn inflate(data: &[u8]) -> SamlResult<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| SamlError::Deflate(format!("decompression error: {e}")))?;
    Ok(decompressed)
}
