use serde::{Deserialize, Serialize};

use crate::{Role, SubjectId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Loading,
    Authenticated,
    Unauthenticated,
}

/// The user part of a session view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: SubjectId,
    pub username: String,
    pub role: Role,
}

/// Client-visible projection of a session.
///
/// Always derived from token state; never stored or edited on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub status: SessionStatus,
    pub user: Option<SessionUser>,
}

impl SessionView {
    pub fn loading() -> Self {
        Self {
            status: SessionStatus::Loading,
            user: None,
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            user: None,
        }
    }

    pub fn authenticated(user: SessionUser) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated && self.user.is_some()
    }
}
