//! Permission-gated rendering.
//!
//! [`check`] answers whether a session may see something; [`Gate`] turns
//! that answer into "render children", "render the fallback" or "render
//! nothing". A session that is still loading is neither allowed nor denied,
//! so nothing unauthorized flashes up before the first status arrives.

use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Loading,
    Denied,
    Allowed,
}

/// Whether `session` grants `required`. Anonymous and failed sessions hold
/// no permissions.
pub fn check(session: &SessionState, required: &str) -> Access {
    match session {
        SessionState::Loading => Access::Loading,
        SessionState::Active(session) if session.has(required) => Access::Allowed,
        SessionState::Active(_) | SessionState::Anonymous | SessionState::Failed(_) => Access::Denied,
    }
}

/// Outcome of passing content through a [`Gate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<T> {
    Loading,
    Children(T),
    Fallback,
    Nothing,
}

impl<T> Rendered<T> {
    pub fn children(self) -> Option<T> {
        match self {
            Rendered::Children(children) => Some(children),
            _ => None,
        }
    }
}

/// Renders content only for sessions holding `required`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    pub required: String,
    /// Show a "not allowed" placeholder instead of nothing when denied.
    pub fallback: bool,
}

impl Gate {
    pub fn new(required: impl Into<String>) -> Self {
        Self {
            required: required.into(),
            fallback: false,
        }
    }

    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn access(&self, session: &SessionState) -> Access {
        check(session, &self.required)
    }

    /// `children` runs only when access is allowed.
    pub fn render<T, F>(&self, session: &SessionState, children: F) -> Rendered<T>
    where
        F: FnOnce() -> T,
    {
        match self.access(session) {
            Access::Loading => Rendered::Loading,
            Access::Allowed => Rendered::Children(children()),
            Access::Denied if self.fallback => Rendered::Fallback,
            Access::Denied => Rendered::Nothing,
        }
    }
}
