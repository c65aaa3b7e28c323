use chrono::{DateTime, Duration, SubsecRound, Utc};

use crate::{AuthError, AuthResult, Identity, SessionClaims, SessionUser, SessionView};

/// Default session lifetime in seconds (30 days).
pub const DEFAULT_SESSION_LIFETIME_SECS: i64 = 30 * 24 * 60 * 60;

/// Longest session lifetime accepted at startup (10 years).
pub const MAX_SESSION_LIFETIME_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Projects identities into claims (at login) and claims into session views
/// (per request).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClaimsEnricher {
    session_lifetime: Duration,
}

impl Default for ClaimsEnricher {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_SESSION_LIFETIME_SECS))
    }
}

impl ClaimsEnricher {
    pub fn new(session_lifetime: Duration) -> Self {
        Self { session_lifetime }
    }

    pub fn session_lifetime(&self) -> Duration {
        self.session_lifetime
    }

    /// Mint a fresh claims set for a verified identity.
    ///
    /// `issued_at` is truncated to whole seconds, the precision tokens carry.
    pub fn from_identity(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> AuthResult<SessionClaims> {
        let issued_at = now.trunc_subsecs(0);
        let expires_at = issued_at
            .checked_add_signed(self.session_lifetime)
            .ok_or(AuthError::LifetimeOutOfRange)?;

        Ok(SessionClaims {
            subject_id: identity.id.clone(),
            username: identity.username.clone(),
            role: identity.role,
            issued_at,
            expires_at,
        })
    }

    pub fn to_session_view(&self, claims: Option<&SessionClaims>) -> SessionView {
        match claims {
            None => SessionView::unauthenticated(),
            Some(claims) => SessionView::authenticated(SessionUser {
                id: claims.subject_id.clone(),
                username: claims.username.clone(),
                role: claims.role,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::{Role, SessionStatus, SubjectId};

    fn admin() -> Identity {
        Identity {
            id: SubjectId::new("u-1"),
            email: "admin@example.com".to_string(),
            username: "admin".to_string(),
            display_name: "Administrator".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn claims_copy_identity_and_apply_lifetime() {
        let now = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let claims = ClaimsEnricher::default().from_identity(&admin(), now).unwrap();

        assert_eq!(claims.subject_id, SubjectId::new("u-1"));
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.issued_at.timestamp(), 1_700_000_000);
        assert_eq!(claims.issued_at.timestamp_subsec_nanos(), 0);
        assert_eq!(claims.expires_at - claims.issued_at, Duration::days(30));
    }

    #[test]
    fn custom_lifetime_is_honoured() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = ClaimsEnricher::new(Duration::hours(1))
            .from_identity(&admin(), now)
            .unwrap();
        assert_eq!(claims.expires_at.timestamp(), 1_700_003_600);
    }

    #[test]
    fn lifetime_past_the_calendar_is_refused() {
        let lifetime = Duration::try_seconds(9_000_000_000_000).unwrap();
        let result = ClaimsEnricher::new(lifetime).from_identity(&admin(), Utc::now());
        assert_eq!(result, Err(AuthError::LifetimeOutOfRange));
    }

    #[test]
    fn absent_claims_map_to_unauthenticated() {
        let view = ClaimsEnricher::default().to_session_view(None);
        assert_eq!(view.status, SessionStatus::Unauthenticated);
        assert!(view.user.is_none());
    }

    #[test]
    fn admin_login_yields_admin_session_view() {
        let enricher = ClaimsEnricher::default();
        let claims = enricher.from_identity(&admin(), Utc::now()).unwrap();
        let view = enricher.to_session_view(Some(&claims));

        assert_eq!(view.status, SessionStatus::Authenticated);
        let user = view.user.unwrap();
        assert_eq!(user.id, SubjectId::new("u-1"));
        assert_eq!(user.username, "admin");
        assert_eq!(user.role, Role::Admin);
    }
}
