//! Outbound redirection actions.

/// A redirection response the embedding application should send to the
/// user-agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectAction {
    /// A 302 Found redirect to the given location.
    Found(String),
    /// A 303 See Other redirect to the given location.
    SeeOther(String),
}

impl RedirectAction {
    /// The HTTP status code of the redirection.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Found(_) => 302,
            Self::SeeOther(_) => 303,
        }
    }

    /// The target location.
    #[must_use]
    pub fn location(&self) -> &str {
        match self {
            Self::Found(location) | Self::SeeOther(location) => location,
        }
    }
}
