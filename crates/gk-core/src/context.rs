//! Inbound request abstraction.
//!
//! The pipeline never touches a concrete web framework; it reads the request
//! through [`WebContext`]. Embedding applications implement the trait over
//! their router's request type. [`MockWebContext`] is provided for tests.

use std::collections::HashMap;

use uuid::Uuid;

/// HTTP request methods the pipeline cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET request.
    Get,
    /// POST request.
    Post,
    /// PUT request.
    Put,
    /// DELETE request.
    Delete,
    /// PATCH request.
    Patch,
    /// HEAD request.
    Head,
    /// OPTIONS request.
    Options,
}

impl HttpMethod {
    /// Returns the canonical upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

/// Read-only view of an inbound HTTP request.
///
/// Implementations must expose header lookup (for `Authorization`-style
/// schemes), query/form parameter lookup (for OAuth callback parameters)
/// and the request method (for method-based authorization).
pub trait WebContext: Send + Sync {
    /// Returns the first value of the named request header, if present.
    fn request_header(&self, name: &str) -> Option<String>;

    /// Returns the named query or form parameter, if present.
    fn request_parameter(&self, name: &str) -> Option<String>;

    /// Returns the HTTP method of the request.
    fn request_method(&self) -> HttpMethod;

    /// Returns an identifier for the user-agent session this request belongs
    /// to. Session stores use it to scope their entries.
    fn session_id(&self) -> String;
}

/// In-memory [`WebContext`] for tests.
#[derive(Debug, Clone)]
pub struct MockWebContext {
    headers: HashMap<String, String>,
    parameters: HashMap<String, String>,
    method: HttpMethod,
    session_id: String,
}

impl MockWebContext {
    /// Creates an empty GET request bound to a fresh session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            headers: HashMap::new(),
            parameters: HashMap::new(),
            method: HttpMethod::Get,
            session_id: Uuid::now_v7().to_string(),
        }
    }

    /// Adds a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a request parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Sets the request method.
    #[must_use]
    pub const fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Binds the request to an existing session, so that several mock
    /// requests can share session state.
    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }
}

impl Default for MockWebContext {
    fn default() -> Self {
        Self::new()
    }
}

impl WebContext for MockWebContext {
    fn request_header(&self, name: &str) -> Option<String> {
        self.headers.get(name).cloned()
    }

    fn request_parameter(&self, name: &str) -> Option<String> {
        self.parameters.get(name).cloned()
    }

    fn request_method(&self) -> HttpMethod {
        self.method
    }

    fn session_id(&self) -> String {
        self.session_id.clone()
    }
}
