//! Request-time route enforcement.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{RouteClass, RoutePolicy, SessionClaims, TokenCodec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    /// Redirect target, already carrying the original destination.
    RedirectTo(String),
}

/// Decision plus whatever session the presented token carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutcome {
    pub class: RouteClass,
    pub decision: GateDecision,
    /// Parsed claims; only ever set for protected routes.
    pub claims: Option<SessionClaims>,
}

/// Stateless per-request gate.
///
/// The output depends only on the arguments and on the policy/secret fixed
/// at construction, so concurrent use needs no locking.
#[derive(Debug, Clone)]
pub struct RouteGate {
    policy: Arc<RoutePolicy>,
    codec: Arc<TokenCodec>,
}

impl RouteGate {
    pub fn new(policy: Arc<RoutePolicy>, codec: Arc<TokenCodec>) -> Self {
        Self { policy, codec }
    }

    pub fn policy(&self) -> &RoutePolicy {
        &self.policy
    }

    pub fn decide(&self, request_path: &str, token: Option<&str>, now: DateTime<Utc>) -> GateDecision {
        self.evaluate(request_path, token, now).decision
    }

    pub fn evaluate(&self, request_path: &str, token: Option<&str>, now: DateTime<Utc>) -> GateOutcome {
        let class = self.policy.classify(request_path);
        if class != RouteClass::Protected {
            return GateOutcome {
                class,
                decision: GateDecision::Pass,
                claims: None,
            };
        }

        match token.and_then(|t| self.codec.parse(t, now)) {
            Some(claims) => GateOutcome {
                class,
                decision: GateDecision::Pass,
                claims: Some(claims),
            },
            None => GateOutcome {
                class,
                decision: GateDecision::RedirectTo(self.policy.login_location(request_path)),
                claims: None,
            },
        }
    }
}
