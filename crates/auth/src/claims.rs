use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Role, SubjectId, TokenRejection};

/// Claims embedded in a session token.
///
/// Field names on the wire follow the token payload layout
/// (`sub`, `username`, `rol`, `iat`, `exp`); timestamps are whole seconds.
/// Every field is required, so a payload missing any of them fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "sub")]
    pub subject_id: SubjectId,

    pub username: String,

    #[serde(rename = "rol")]
    pub role: Role,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Validate decoded claims against the session schema and the clock.
///
/// Signature verification happens before this in [`crate::TokenCodec`].
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), TokenRejection> {
    if claims.subject_id.is_empty() || claims.username.trim().is_empty() {
        return Err(TokenRejection::MissingSubject);
    }
    if claims.expires_at <= claims.issued_at {
        return Err(TokenRejection::InvalidTimeWindow);
    }
    if claims.is_expired(now) {
        return Err(TokenRejection::Expired);
    }
    Ok(())
}
