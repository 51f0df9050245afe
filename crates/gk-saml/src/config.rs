//! SAML client configuration.

use std::sync::Arc;

use gk_core::{RandomValueGenerator, ValueGenerator};

use crate::binding::SamlBinding;

/// Configuration for a SAML 2.0 service-provider client.
pub struct Saml2Configuration {
    /// The service provider entity id, sent as the request issuer.
    pub entity_id: String,
    /// The identity provider single sign-on endpoint.
    pub idp_sso_url: String,
    /// The binding callback responses arrive on.
    pub binding: SamlBinding,
    /// Generates the relay state parked before each redirect.
    pub relay_state_generator: Arc<dyn ValueGenerator>,
}

impl Saml2Configuration {
    /// Creates a configuration expecting HTTP-POST callbacks.
    #[must_use]
    pub fn new(entity_id: impl Into<String>, idp_sso_url: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            idp_sso_url: idp_sso_url.into(),
            binding: SamlBinding::Post,
            relay_state_generator: Arc::new(RandomValueGenerator::default()),
        }
    }

    /// Session key under which the relay state is parked.
    #[must_use]
    pub fn relay_state_session_key(&self, client_name: &str) -> String {
        format!("{client_name}.saml.relay_state")
    }
}
