//! Credential verification against the identity store.

use std::sync::Arc;
use std::time::Duration;

use crate::{AuthError, AuthResult, Identity, IdentityStore};

/// Default bound on a single identity store round trip.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Thin adapter over an [`IdentityStore`].
///
/// Fail-closed: every failure mode ends in "not verified". One attempt per
/// login; nothing is retried.
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn IdentityStore>,
    timeout: Duration,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self {
            store,
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn verify(&self, identifier: &str, secret: &str) -> Option<Identity> {
        match self.authenticate(identifier, secret).await {
            Ok(identity) => Some(identity),
            Err(AuthError::StoreUnavailable) => {
                tracing::warn!(cause = "store_unavailable", "login rejected");
                None
            }
            Err(e) => {
                tracing::info!(cause = "invalid_credential", error = %e, "login rejected");
                None
            }
        }
    }

    /// Same as [`CredentialVerifier::verify`] but keeps the failure cause.
    ///
    /// The cause is for logs only; callers facing end users must not expose it.
    pub async fn authenticate(&self, identifier: &str, secret: &str) -> AuthResult<Identity> {
        let identifier = identifier.trim();
        if identifier.is_empty() || secret.is_empty() {
            return Err(AuthError::InvalidCredential);
        }

        let identity = tokio::time::timeout(self.timeout, self.store.lookup_identity(identifier))
            .await
            .map_err(|_| AuthError::StoreUnavailable)??
            .ok_or(AuthError::InvalidCredential)?;

        let matches = tokio::time::timeout(self.timeout, self.store.verify_secret(&identity, secret))
            .await
            .map_err(|_| AuthError::StoreUnavailable)??;

        if !matches {
            return Err(AuthError::InvalidCredential);
        }

        tracing::debug!(subject = %identity.id, role = %identity.role, "credentials verified");
        Ok(identity)
    }
}

impl core::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
