use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderValue};

use stockgate_auth::SessionView;

use crate::mount::SessionSource;

pub const SESSION_ENDPOINT: &str = "/api/auth/session";

/// Fetches the session view from the API's session endpoint.
///
/// Any transport or decoding failure resolves to an unauthenticated view.
#[derive(Debug, Clone)]
pub struct HttpSessionSource {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl HttpSessionSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers: HeaderMap::new(),
        }
    }

    /// Present the session cookie with every fetch.
    pub fn with_cookie(mut self, cookie: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(cookie) {
            self.headers.insert(COOKIE, value);
        }
        self
    }

    pub fn with_bearer(mut self, token: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
            self.headers.insert(AUTHORIZATION, value);
        }
        self
    }

    async fn fetch(&self) -> Result<SessionView, reqwest::Error> {
        self.client
            .get(format!("{}{}", self.base_url, SESSION_ENDPOINT))
            .headers(self.headers.clone())
            .send()
            .await?
            .error_for_status()?
            .json::<SessionView>()
            .await
    }
}

#[async_trait]
impl SessionSource for HttpSessionSource {
    async fn fetch_session(&self) -> SessionView {
        match self.fetch().await {
            Ok(view) => view,
            Err(e) => {
                tracing::warn!(error = %e, "session fetch failed; treating as unauthenticated");
                SessionView::unauthenticated()
            }
        }
    }
}
