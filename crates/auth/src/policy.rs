//! Route classification shared by the server gate and the client guard.

use std::borrow::Cow;

/// Where unauthenticated callers are sent.
pub const LOGIN_PATH: &str = "/login";

/// Query parameter carrying the original destination.
pub const CALLBACK_PARAM: &str = "callbackUrl";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// Static asset; delivered regardless of session state.
    Asset,
    /// Reachable without a session.
    Public,
    /// Requires a valid session.
    Protected,
}

/// Ordered route matcher.
///
/// Evaluation order is asset exclusions, then public prefixes, then the
/// protected default. Prefixes match on path-segment boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    asset_prefixes: Vec<Cow<'static, str>>,
    asset_extensions: Vec<Cow<'static, str>>,
    public_prefixes: Vec<Cow<'static, str>>,
    login_path: Cow<'static, str>,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            asset_prefixes: ["/_next/static", "/_next/image", "/favicon.ico", "/static"]
                .into_iter()
                .map(Cow::Borrowed)
                .collect(),
            asset_extensions: ["svg", "png", "jpg", "jpeg", "gif", "webp", "ico"]
                .into_iter()
                .map(Cow::Borrowed)
                .collect(),
            public_prefixes: [LOGIN_PATH, "/api/auth", "/api/register", "/health"]
                .into_iter()
                .map(Cow::Borrowed)
                .collect(),
            login_path: Cow::Borrowed(LOGIN_PATH),
        }
    }
}

impl RoutePolicy {
    /// A policy with no exclusions and no public routes.
    pub fn empty(login_path: impl Into<Cow<'static, str>>) -> Self {
        Self {
            asset_prefixes: Vec::new(),
            asset_extensions: Vec::new(),
            public_prefixes: Vec::new(),
            login_path: login_path.into(),
        }
    }

    pub fn with_asset_prefix(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.asset_prefixes.push(prefix.into());
        self
    }

    pub fn with_public_prefix(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.public_prefixes.push(prefix.into());
        self
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn public_prefixes(&self) -> impl Iterator<Item = &str> {
        self.public_prefixes.iter().map(|p| p.as_ref())
    }

    /// Classify a request target. Any query string or fragment is ignored.
    pub fn classify(&self, target: &str) -> RouteClass {
        let path = path_of(target);

        if self.asset_prefixes.iter().any(|p| matches_prefix(path, p))
            || self.has_asset_extension(path)
        {
            return RouteClass::Asset;
        }
        if self.public_prefixes.iter().any(|p| matches_prefix(path, p)) {
            return RouteClass::Public;
        }
        RouteClass::Protected
    }

    pub fn requires_session(&self, target: &str) -> bool {
        self.classify(target) == RouteClass::Protected
    }

    /// Login location preserving `destination` for the post-login resume.
    pub fn login_location(&self, destination: &str) -> String {
        format!(
            "{}?{}={}",
            self.login_path,
            CALLBACK_PARAM,
            urlencoding::encode(destination)
        )
    }

    fn has_asset_extension(&self, path: &str) -> bool {
        let last = path.rsplit('/').next().unwrap_or(path);
        match last.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self
                .asset_extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext)),
            _ => false,
        }
    }
}

fn path_of(target: &str) -> &str {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    &target[..end]
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Accept a post-login destination only if it stays on this origin.
pub fn sanitize_callback(callback: Option<&str>) -> String {
    match callback {
        Some(c) if c.starts_with('/') && !c.starts_with("//") && !c.starts_with("/\\") => {
            c.to_string()
        }
        _ => "/".to_string(),
    }
}
