use serde::{Deserialize, Serialize};

use crate::Role;

/// Identifier of an identity as assigned by the identity store.
///
/// Opaque to this crate; it becomes the `sub` of every session minted for
/// the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl core::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SubjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SubjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// An identity as read from the external identity store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: SubjectId,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub role: Role,
}

/// Login credentials, as presented by a caller.
///
/// Lives only for the duration of one login attempt. Absent fields read as
/// empty and fail verification like any other bad input.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credential {
    #[serde(default, alias = "username", alias = "email")]
    pub identifier: String,
    #[serde(default, alias = "password")]
    pub secret: String,
}

impl Credential {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}
