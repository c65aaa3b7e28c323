//! Login exchange and session materialization.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;

use stockgate_auth::{AuthError, Credential, sanitize_callback};

use crate::app::dto::{CallbackQuery, LoginPageResponse, LoginQuery, LoginResponse, TokenTransport};
use crate::app::errors::{auth_error_to_response, invalid_credentials};
use crate::app::services::AuthServices;
use crate::cookie::extract_token;

pub async fn login(
    Extension(services): Extension<Arc<AuthServices>>,
    Query(query): Query<LoginQuery>,
    Json(credential): Json<Credential>,
) -> Response {
    let Some(identity) = services
        .verifier
        .verify(&credential.identifier, &credential.secret)
        .await
    else {
        return invalid_credentials();
    };
    drop(credential);

    let claims = match services.enricher.from_identity(&identity, Utc::now()) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::error!(error = %e, "failed to mint session claims");
            return auth_error_to_response(e);
        }
    };
    let token = match services.codec.issue(&claims) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "failed to issue session token");
            return auth_error_to_response(e);
        }
    };

    let cookie = match services.cookie.issue(token.as_str()) {
        Ok(cookie) => cookie,
        Err(e) => {
            tracing::error!(error = %e, "session token is not a valid cookie value");
            return auth_error_to_response(AuthError::Signing(e.to_string()));
        }
    };

    tracing::info!(subject = %claims.subject_id, role = %claims.role, "session issued");

    let body = LoginResponse {
        session: services.enricher.to_session_view(Some(&claims)),
        token: (query.transport == TokenTransport::Bearer).then(|| token.into_string()),
        redirect_to: sanitize_callback(query.callback_url.as_deref()),
    };

    (StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(body)).into_response()
}

pub async fn logout(Extension(services): Extension<Arc<AuthServices>>) -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, services.cookie.clear())],
        Json(serde_json::json!({ "status": "ok" })),
    )
        .into_response()
}

/// Session view for whatever token the caller presents.
///
/// This route is public; an absent or invalid token simply yields an
/// unauthenticated view.
pub async fn session(
    Extension(services): Extension<Arc<AuthServices>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let claims = extract_token(&headers).and_then(|t| services.codec.parse(&t, Utc::now()));
    Json(services.enricher.to_session_view(claims.as_ref()))
}

pub async fn login_page(Query(query): Query<CallbackQuery>) -> impl IntoResponse {
    Json(LoginPageResponse {
        login_endpoint: "/api/auth/login",
        callback_url: sanitize_callback(query.callback_url.as_deref()),
    })
}
