//! Session cookie handling and token extraction.

use axum::http::{HeaderMap, HeaderValue, header};

pub const SESSION_COOKIE: &str = "session-token";

/// Attributes of the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub secure: bool,
    pub max_age_secs: i64,
}

impl SessionCookie {
    pub fn new(secure: bool, max_age_secs: i64) -> Self {
        Self { secure, max_age_secs }
    }

    pub fn issue(&self, token: &str) -> Result<HeaderValue, header::InvalidHeaderValue> {
        HeaderValue::from_str(&self.render(token, self.max_age_secs))
    }

    pub fn clear(&self) -> HeaderValue {
        // Only ASCII from constants; cannot fail.
        HeaderValue::from_str(&self.render("", 0)).unwrap_or_else(|_| HeaderValue::from_static(""))
    }

    fn render(&self, value: &str, max_age: i64) -> String {
        let mut cookie = format!(
            "{SESSION_COOKIE}={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}"
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Read a named cookie from the request headers.
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
}

/// Presented session token: the session cookie, else a bearer token.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = parse_cookie(headers, SESSION_COOKIE).filter(|t| !t.is_empty()) {
        return Some(token);
    }
    extract_bearer(headers).map(str::to_string)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
