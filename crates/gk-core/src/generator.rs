//! Value generators for handshake state.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Produces opaque values for anti-CSRF state and similar handshake tokens.
pub trait ValueGenerator: Send + Sync {
    /// Generates a fresh value.
    fn generate_value(&self) -> String;
}

/// Generates random alphanumeric values.
#[derive(Debug, Clone, Copy)]
pub struct RandomValueGenerator {
    length: usize,
}

impl RandomValueGenerator {
    /// Creates a generator producing values of the given length.
    #[must_use]
    pub const fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomValueGenerator {
    fn default() -> Self {
        Self::new(32)
    }
}

impl ValueGenerator for RandomValueGenerator {
    fn generate_value(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

/// Always returns the same configured value. For tests.
#[derive(Debug, Clone)]
pub struct StaticValueGenerator(pub String);

impl ValueGenerator for StaticValueGenerator {
    fn generate_value(&self) -> String {
        self.0.clone()
    }
}
