use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::errors::json_error;
use crate::app::services::AuthServices;
use crate::context::SessionContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    Extension(services): Extension<Arc<AuthServices>>,
    Extension(session): Extension<SessionContext>,
) -> impl IntoResponse {
    Json(services.enricher.to_session_view(Some(session.claims())))
}

pub async fn not_found() -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "not found")
}
