//! Identity store boundary.
//!
//! The store owns identities and their credential representation; this crate
//! only asks two questions of it.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use async_trait::async_trait;
use serde::Deserialize;

use crate::{Identity, Role, StoreError, SubjectId};

#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Find an identity by login identifier (email or username).
    async fn lookup_identity(&self, identifier: &str) -> Result<Option<Identity>, StoreError>;

    /// Check a presented secret against the stored credential representation.
    async fn verify_secret(&self, identity: &Identity, secret: &str) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S> IdentityStore for Arc<S>
where
    S: IdentityStore + ?Sized,
{
    async fn lookup_identity(&self, identifier: &str) -> Result<Option<Identity>, StoreError> {
        (**self).lookup_identity(identifier).await
    }

    async fn verify_secret(&self, identity: &Identity, secret: &str) -> Result<bool, StoreError> {
        (**self).verify_secret(identity, secret).await
    }
}

/// One seeded account for [`InMemoryIdentityStore`].
#[derive(Debug, Clone, Deserialize)]
pub struct SeedIdentity {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub role: Role,
    pub secret: String,
}

#[derive(Debug, Clone)]
struct Entry {
    identity: Identity,
    secret: String,
}

/// In-memory identity store for tests/dev.
///
/// Secrets are held as given; production deployments plug in the real
/// identity store instead.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    inner: RwLock<HashMap<SubjectId, Entry>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load accounts from a JSON array of [`SeedIdentity`] objects.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let seeds: Vec<SeedIdentity> = serde_json::from_str(json)?;
        let store = Self::new();
        for seed in seeds {
            let identity = Identity {
                display_name: seed.display_name.unwrap_or_else(|| seed.username.clone()),
                id: SubjectId::new(seed.id),
                email: seed.email,
                username: seed.username,
                role: seed.role,
            };
            store.insert(identity, seed.secret);
        }
        Ok(store)
    }

    pub fn insert(&self, identity: Identity, secret: impl Into<String>) {
        // Each write is a single map insert, so a poisoned map is still consistent.
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(
            identity.id.clone(),
            Entry {
                identity,
                secret: secret.into(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<SubjectId, Entry>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn lookup_identity(&self, identifier: &str) -> Result<Option<Identity>, StoreError> {
        let map = self.read();
        let found = map.values().find(|e| {
            e.identity.username == identifier || e.identity.email.eq_ignore_ascii_case(identifier)
        });
        Ok(found.map(|e| e.identity.clone()))
    }

    async fn verify_secret(&self, identity: &Identity, secret: &str) -> Result<bool, StoreError> {
        let map = self.read();
        Ok(map.get(&identity.id).is_some_and(|e| e.secret == secret))
    }
}
