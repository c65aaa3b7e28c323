use std::sync::Arc;

use stockgate_auth::{
    ClaimsEnricher, CredentialVerifier, IdentityStore, RouteGate, RoutePolicy, TokenCodec,
};

use crate::config::AppConfig;
use crate::cookie::SessionCookie;

/// Authentication services shared by the middleware and the handlers.
///
/// Built once at startup from [`AppConfig`]; nothing in here changes while
/// the process runs.
#[derive(Debug, Clone)]
pub struct AuthServices {
    pub gate: Arc<RouteGate>,
    pub codec: Arc<TokenCodec>,
    pub enricher: ClaimsEnricher,
    pub verifier: CredentialVerifier,
    pub cookie: SessionCookie,
}

impl AuthServices {
    pub fn policy(&self) -> &RoutePolicy {
        self.gate.policy()
    }
}

pub fn build_services(config: &AppConfig, store: Arc<dyn IdentityStore>) -> AuthServices {
    let codec = Arc::new(TokenCodec::new(&config.signing_secret));

    let gate = Arc::new(RouteGate::new(Arc::new(RoutePolicy::default()), codec.clone()));

    let enricher = ClaimsEnricher::new(config.session_lifetime);
    let verifier = CredentialVerifier::new(store).with_timeout(config.login_timeout);
    let cookie = SessionCookie::new(config.cookie_secure, config.session_lifetime.num_seconds());

    AuthServices {
        gate,
        codec,
        enricher,
        verifier,
        cookie,
    }
}
