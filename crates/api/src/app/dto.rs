use serde::{Deserialize, Serialize};

use stockgate_auth::SessionView;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

/// How the caller intends to present the session on later requests.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenTransport {
    /// `HttpOnly` cookie only; the token never reaches script.
    #[default]
    Cookie,
    /// Token is also returned in the body for an `Authorization` header.
    Bearer,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
    #[serde(default)]
    pub transport: TokenTransport,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub session: SessionView,
    /// Where the client should continue after login.
    pub redirect_to: String,
}

#[derive(Debug, Serialize)]
pub struct LoginPageResponse {
    pub login_endpoint: &'static str,
    pub callback_url: String,
}
