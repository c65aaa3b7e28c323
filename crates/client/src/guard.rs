//! Client-side session guard.
//!
//! Mirrors the server gate for a page shell that is already rendering, so
//! protected content never shows before the session is known. The server
//! gate stays authoritative; this only avoids the flash.

use std::sync::Arc;

use stockgate_auth::{RoutePolicy, SessionStatus, SessionUser, SessionView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Session not resolved yet on this mount.
    Loading,
    Authenticated(SessionUser),
    Unauthenticated,
}

/// What the shell should draw for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render<'a> {
    Placeholder,
    Protected(&'a SessionUser),
    Nothing,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardEffect {
    Navigate(String),
}

/// One mount of a guarded page.
///
/// Starts in [`GuardState::Loading`] and resolves at most once. A new mount
/// means a new guard.
#[derive(Debug, Clone)]
pub struct ClientSessionGuard {
    path: String,
    policy: Arc<RoutePolicy>,
    state: GuardState,
}

impl ClientSessionGuard {
    pub fn mount(path: impl Into<String>, policy: Arc<RoutePolicy>) -> Self {
        Self {
            path: path.into(),
            policy,
            state: GuardState::Loading,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn is_resolved(&self) -> bool {
        self.state != GuardState::Loading
    }

    /// Apply a resolved session view.
    ///
    /// A `loading` view, or any view after the first resolution, is ignored.
    pub fn resolve(&mut self, view: &SessionView) -> Option<GuardEffect> {
        if self.is_resolved() {
            tracing::trace!(path = %self.path, "guard already resolved; ignoring view");
            return None;
        }

        match (view.status, &view.user) {
            (SessionStatus::Loading, _) => None,
            (SessionStatus::Authenticated, Some(user)) => {
                self.state = GuardState::Authenticated(user.clone());
                None
            }
            _ => {
                self.state = GuardState::Unauthenticated;
                if self.policy.requires_session(&self.path) {
                    let location = self.policy.login_location(&self.path);
                    tracing::debug!(path = %self.path, %location, "no session; leaving guarded page");
                    Some(GuardEffect::Navigate(location))
                } else {
                    None
                }
            }
        }
    }

    pub fn render(&self) -> Render<'_> {
        match &self.state {
            GuardState::Loading => Render::Placeholder,
            GuardState::Authenticated(user) => Render::Protected(user),
            GuardState::Unauthenticated => Render::Nothing,
        }
    }
}
