use stockgate_auth::SessionClaims;

/// Session attached to a request that passed the gate on a protected route.
///
/// Immutable; handlers only read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    claims: SessionClaims,
}

impl SessionContext {
    pub fn new(claims: SessionClaims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &SessionClaims {
        &self.claims
    }
}
