//! Signed session tokens (compact JWS, HS256).

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{AuthError, AuthResult, SessionClaims, TokenRejection, validate_claims};

/// Process-wide signing secret.
///
/// Read once at startup; there is no way to change it afterwards, so a
/// rotation means a restart and invalidates every outstanding token.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> AuthResult<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(AuthError::InvalidSecret);
        }
        Ok(Self(bytes))
    }

    pub fn byte_len(&self) -> usize {
        self.0.len()
    }
}

impl core::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SigningSecret(<{} bytes>)", self.0.len())
    }
}

/// A serialized, signed session token.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Issues and parses session tokens under a single secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `validate_claims`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);

        Self {
            encoding: EncodingKey::from_secret(&secret.0),
            decoding: DecodingKey::from_secret(&secret.0),
            validation,
        }
    }

    pub fn issue(&self, claims: &SessionClaims) -> AuthResult<SessionToken> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map(SessionToken)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Parse a presented token. Any failure yields `None`.
    pub fn parse(&self, token: &str, now: DateTime<Utc>) -> Option<SessionClaims> {
        match self.decode(token, now) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!(reason = %e, "session token rejected");
                None
            }
        }
    }

    /// Like [`TokenCodec::parse`], but reports why the token was refused.
    ///
    /// The signature is verified before the payload is looked at.
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenRejection> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenRejection::BadSignature);
        }

        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::Json(_)
                | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_) => {
                    TokenRejection::MalformedClaims
                }
                _ => TokenRejection::BadSignature,
            })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

impl core::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    use super::*;
    use crate::{Role, SubjectId};

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(&SigningSecret::new(secret).unwrap())
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn claims(iat: i64, lifetime: i64) -> SessionClaims {
        SessionClaims {
            subject_id: SubjectId::new("u-1"),
            username: "admin".to_string(),
            role: Role::Admin,
            issued_at: at(iat),
            expires_at: at(iat + lifetime),
        }
    }

    #[test]
    fn empty_secret_is_refused() {
        assert_eq!(SigningSecret::new(Vec::new()).unwrap_err(), AuthError::InvalidSecret);
    }

    #[test]
    fn issue_then_parse_round_trips() {
        let codec = codec("test-secret");
        let c = claims(1_700_000_000, 3600);
        let token = codec.issue(&c).unwrap();

        assert_eq!(codec.parse(token.as_str(), at(1_700_000_100)), Some(c));
    }

    #[test]
    fn parsing_is_repeatable() {
        let codec = codec("test-secret");
        let token = codec.issue(&claims(1_700_000_000, 3600)).unwrap();
        let now = at(1_700_000_100);

        assert_eq!(codec.parse(token.as_str(), now), codec.parse(token.as_str(), now));
    }

    #[test]
    fn expired_token_is_refused() {
        let codec = codec("test-secret");
        let token = codec.issue(&claims(1_700_000_000, 60)).unwrap();

        assert_eq!(
            codec.decode(token.as_str(), at(1_700_000_060)),
            Err(TokenRejection::Expired)
        );
        assert_eq!(codec.parse(token.as_str(), at(1_700_000_061)), None);
    }

    #[test]
    fn rotated_secret_invalidates_tokens() {
        let token = codec("old-secret").issue(&claims(1_700_000_000, 3600)).unwrap();
        assert_eq!(
            codec("new-secret").decode(token.as_str(), at(1_700_000_001)),
            Err(TokenRejection::BadSignature)
        );
    }

    #[test]
    fn tampered_payload_is_refused() {
        let codec = codec("test-secret");
        let token = codec.issue(&claims(1_700_000_000, 3600)).unwrap();
        let forged = URL_SAFE_NO_PAD.encode(
            br#"{"sub":"u-2","username":"mallory","rol":"admin","iat":1700000000,"exp":1900000000}"#,
        );
        let mut parts: Vec<&str> = token.as_str().split('.').collect();
        parts[1] = forged.as_str();

        assert_eq!(
            codec.decode(&parts.join("."), at(1_700_000_001)),
            Err(TokenRejection::BadSignature)
        );
    }

    #[test]
    fn garbage_and_empty_tokens_are_refused() {
        let codec = codec("test-secret");
        let now = at(1_700_000_000);
        assert_eq!(codec.parse("", now), None);
        assert_eq!(codec.parse("not-a-token", now), None);
        assert_eq!(codec.parse("a.b.c", now), None);
    }

    #[test]
    fn signed_payload_missing_fields_is_refused() {
        #[derive(serde::Serialize)]
        struct Partial {
            sub: &'static str,
            iat: i64,
            exp: i64,
        }

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &Partial { sub: "u-1", iat: 1_700_000_000, exp: 1_800_000_000 },
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(
            codec("test-secret").decode(&token, at(1_700_000_001)),
            Err(TokenRejection::MalformedClaims)
        );
    }

    #[test]
    fn debug_output_hides_material() {
        let secret = SigningSecret::new("super-secret").unwrap();
        assert!(!format!("{secret:?}").contains("super-secret"));

        let token = TokenCodec::new(&secret).issue(&claims(1_700_000_000, 60)).unwrap();
        assert!(!format!("{token:?}").contains(token.as_str()));
    }

    proptest! {
        #[test]
        fn round_trip_holds_for_unexpired_claims(
            iat in 1_000_000_000i64..2_000_000_000,
            lifetime in 1i64..10_000_000,
            elapsed_fraction in 0.0f64..1.0,
            username in "[a-z][a-z0-9_]{0,15}",
            admin in any::<bool>(),
        ) {
            let codec = codec("prop-secret");
            let c = SessionClaims {
                subject_id: SubjectId::new(format!("id-{username}")),
                username,
                role: if admin { Role::Admin } else { Role::User },
                issued_at: at(iat),
                expires_at: at(iat + lifetime),
            };
            let now = at(iat) + Duration::seconds((lifetime as f64 * elapsed_fraction) as i64);
            prop_assume!(now < c.expires_at);

            let token = codec.issue(&c).unwrap();
            prop_assert_eq!(codec.parse(token.as_str(), now), Some(c));
        }
    }
}
