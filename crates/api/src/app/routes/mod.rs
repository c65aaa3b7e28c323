use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod system;

/// Router for every endpoint behind the gate.
///
/// Which of them need a session is decided by the route policy, not here.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/whoami", get(system::whoami))
        .route("/login", get(auth::login_page))
        .nest("/api/auth", auth_router())
}

fn auth_router() -> Router {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session))
}
