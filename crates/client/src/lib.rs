//! `stockgate-client` — client-side session guard.
//!
//! Defense in depth only: the server gate is the enforcement point.

pub mod guard;
pub mod http;
pub mod mount;

pub use guard::{ClientSessionGuard, GuardEffect, GuardState, Render};
pub use http::{HttpSessionSource, SESSION_ENDPOINT};
pub use mount::{MountedGuard, Navigator, SessionSource};
