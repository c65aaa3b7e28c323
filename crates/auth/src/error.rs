//! Error taxonomy for the authentication boundary.
//!
//! None of these reach an end user verbatim: the HTTP layer collapses
//! credential and store failures into one generic 401, and token failures
//! into a redirect or an unauthenticated session view.

use thiserror::Error;

/// Reason a presented session token was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenRejection {
    #[error("malformed token or bad signature")]
    BadSignature,

    #[error("claims payload does not match the session schema")]
    MalformedClaims,

    #[error("subject or username is empty")]
    MissingSubject,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("token has expired")]
    Expired,
}

/// Errors reported by an identity store implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("identity store unavailable: {0}")]
    Unavailable(String),

    #[error("identity store error: {0}")]
    Backend(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown identifier, wrong secret, or missing input.
    #[error("invalid credentials")]
    InvalidCredential,

    /// Identity store failed or timed out during login.
    #[error("identity store unavailable")]
    StoreUnavailable,

    /// Session lifetime pushes expiry past the representable calendar.
    #[error("session lifetime out of range")]
    LifetimeOutOfRange,

    #[error("failed to sign session token: {0}")]
    Signing(String),

    #[error("signing secret must not be empty")]
    InvalidSecret,
}

impl From<StoreError> for AuthError {
    fn from(_: StoreError) -> Self {
        AuthError::StoreUnavailable
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
