//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: builds the gate, codec, enricher and verifier from config
//! - `routes/`: HTTP handlers
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AuthServices, build_services};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Every request, including unmatched ones, goes through the gate first.
pub fn build_app(services: AuthServices) -> Router {
    let auth_state = middleware::AuthState {
        gate: services.gate.clone(),
    };
    tracing::debug!(
        login_path = services.policy().login_path(),
        public = ?services.policy().public_prefixes().collect::<Vec<_>>(),
        "route policy loaded"
    );

    routes::router()
        .fallback(routes::system::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(Extension(Arc::new(services)))
                .layer(axum::middleware::from_fn_with_state(
                    auth_state,
                    middleware::gate_middleware,
                )),
        )
}
