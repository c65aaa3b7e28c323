//! `stockgate-auth` — session authentication boundary.
//!
//! Credential verification, session token issuance/parsing, claim projection
//! and route enforcement. Transport-agnostic: nothing here knows about HTTP.

pub mod claims;
pub mod codec;
pub mod enricher;
pub mod error;
pub mod gate;
pub mod identity;
pub mod policy;
pub mod roles;
pub mod session;
pub mod store;
pub mod verifier;

pub use claims::{SessionClaims, validate_claims};
pub use codec::{SessionToken, SigningSecret, TokenCodec};
pub use enricher::{ClaimsEnricher, DEFAULT_SESSION_LIFETIME_SECS, MAX_SESSION_LIFETIME_SECS};
pub use error::{AuthError, AuthResult, StoreError, TokenRejection};
pub use gate::{GateDecision, GateOutcome, RouteGate};
pub use identity::{Credential, Identity, SubjectId};
pub use policy::{CALLBACK_PARAM, LOGIN_PATH, RouteClass, RoutePolicy, sanitize_callback};
pub use roles::Role;
pub use session::{SessionStatus, SessionUser, SessionView};
pub use store::{IdentityStore, InMemoryIdentityStore, SeedIdentity};
pub use verifier::{CredentialVerifier, DEFAULT_STORE_TIMEOUT};
