use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockgate_auth::AuthError;

/// Map an authentication error to a response.
///
/// Credential and store failures produce the same 401 body so callers cannot
/// tell an unknown identifier from a wrong secret or an outage.
pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::InvalidCredential | AuthError::StoreUnavailable => invalid_credentials(),
        AuthError::Signing(_) | AuthError::InvalidSecret | AuthError::LifetimeOutOfRange => {
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "session_error",
                "could not establish a session",
            )
        }
    }
}

pub fn invalid_credentials() -> axum::response::Response {
    json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", "invalid credentials")
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
