use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tracing::Instrument;
use uuid::Uuid;

use stockgate_auth::{GateDecision, RouteGate};

use crate::context::SessionContext;
use crate::cookie::extract_token;

#[derive(Clone)]
pub struct AuthState {
    pub gate: Arc<RouteGate>,
}

/// Runs every request through the route gate.
///
/// Protected requests without a valid session are redirected to the login
/// page; passing protected requests get a [`SessionContext`] extension.
pub async fn gate_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let span = tracing::info_span!(
        "http.request",
        request_id = %Uuid::now_v7(),
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        let target = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| req.uri().path().to_string());
        let token = extract_token(req.headers());

        let outcome = state.gate.evaluate(&target, token.as_deref(), Utc::now());

        match outcome.decision {
            GateDecision::RedirectTo(location) => {
                tracing::debug!(
                    class = ?outcome.class,
                    token_present = token.is_some(),
                    "no valid session; redirecting to login"
                );
                Redirect::temporary(&location).into_response()
            }
            GateDecision::Pass => {
                if let Some(claims) = outcome.claims {
                    req.extensions_mut().insert(SessionContext::new(claims));
                }
                next.run(req).await
            }
        }
    }
    .instrument(span)
    .await
}
