//! Signed, expiring session tokens (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::claims::{SessionClaims, validate_claims};

/// Token validity window used when none is configured (one hour).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Longest accepted validity window (one year).
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 3600;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token encoding failed: {0}")]
    Encoding(String),

    #[error("token lifetime must be between 1 and {MAX_TOKEN_TTL_SECS} seconds: {0}")]
    InvalidTtl(String),
}

/// Opaque, self-contained session token handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mints tokens for authenticated principals.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, username: &str, now: DateTime<Utc>) -> Result<SessionToken, TokenError>;
}

/// Verifies tokens and recovers their claims.
///
/// Implementations must check, in order: structure, signature, then expiry.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError>;
}

/// HS256 issuer/verifier over a single process-wide shared secret.
///
/// Stateless: nothing about issued tokens is remembered, so rotating the secret
/// invalidates every outstanding token and there is no revocation.
#[derive(Clone)]
pub struct Hs256TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl Hs256TokenService {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self::build(secret.as_ref(), Duration::seconds(DEFAULT_TOKEN_TTL_SECS))
    }

    /// Service with a custom validity window.
    ///
    /// Windows shorter than one second would yield `exp == iat` on the wire and
    /// never verify, so they are rejected along with anything past a year.
    pub fn with_ttl(secret: impl AsRef<[u8]>, ttl: Duration) -> Result<Self, TokenError> {
        let bounds = Duration::seconds(1)..=Duration::seconds(MAX_TOKEN_TTL_SECS);
        if !bounds.contains(&ttl) {
            return Err(TokenError::InvalidTtl(format!("{ttl}")));
        }
        Ok(Self::build(secret.as_ref(), ttl))
    }

    fn build(secret: &[u8], ttl: Duration) -> Self {

        // Expiry is judged against the caller's clock in `verify`, not the library's.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl core::fmt::Debug for Hs256TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer for Hs256TokenService {
    fn issue(&self, username: &str, now: DateTime<Utc>) -> Result<SessionToken, TokenError> {
        let claims = SessionClaims::new(username, now, self.ttl)?;
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;
        Ok(SessionToken(token))
    }
}

impl TokenVerifier for Hs256TokenService {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(classify)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        other => TokenError::Malformed(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use proptest::prelude::*;

    use super::*;

    const SECRET: &[u8] = b"test-secret";

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    fn service() -> Hs256TokenService {
        Hs256TokenService::new(SECRET)
    }

    #[test]
    fn issued_token_verifies_immediately() {
        let svc = service();
        let token = svc.issue("alice", t0()).unwrap();
        let claims = svc.verify(token.as_str(), t0()).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.issued_at, t0());
        assert_eq!(claims.expires_at, t0() + Duration::hours(1));
    }

    #[test]
    fn token_expires_after_one_hour() {
        let svc = service();
        let token = svc.issue("alice", t0()).unwrap();

        let at_59 = svc.verify(token.as_str(), t0() + Duration::minutes(59));
        assert_eq!(at_59.map(|c| c.username), Ok("alice".to_string()));

        let at_61 = svc.verify(token.as_str(), t0() + Duration::minutes(61));
        assert_eq!(at_61, Err(TokenError::Expired));
    }

    #[test]
    fn custom_ttl_is_honoured() {
        let svc = Hs256TokenService::with_ttl(SECRET, Duration::minutes(5)).unwrap();
        let token = svc.issue("alice", t0()).unwrap();
        assert!(svc.verify(token.as_str(), t0() + Duration::minutes(4)).is_ok());
        assert_eq!(
            svc.verify(token.as_str(), t0() + Duration::minutes(6)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn ttl_outside_bounds_is_rejected() {
        for ttl in [
            Duration::zero(),
            Duration::milliseconds(500),
            Duration::seconds(-60),
            Duration::seconds(MAX_TOKEN_TTL_SECS + 1),
        ] {
            assert!(
                matches!(
                    Hs256TokenService::with_ttl(SECRET, ttl),
                    Err(TokenError::InvalidTtl(_))
                ),
                "expected InvalidTtl for {ttl}"
            );
        }
    }

    #[test]
    fn shortest_and_longest_ttl_verify_immediately() {
        for ttl in [
            Duration::seconds(1),
            Duration::milliseconds(1500),
            Duration::seconds(MAX_TOKEN_TTL_SECS),
        ] {
            let svc = Hs256TokenService::with_ttl(SECRET, ttl).unwrap();
            let token = svc.issue("alice", t0()).unwrap();
            assert!(svc.verify(token.as_str(), t0()).is_ok(), "ttl {ttl}");
        }
    }

    #[test]
    fn issuing_past_the_calendar_fails_without_panicking() {
        let near_end = DateTime::<Utc>::MAX_UTC - Duration::minutes(30);
        assert!(matches!(
            service().issue("alice", near_end),
            Err(TokenError::Encoding(_))
        ));
    }

    #[test]
    fn rotated_secret_rejects_outstanding_tokens() {
        let token = service().issue("alice", t0()).unwrap();
        let rotated = Hs256TokenService::new(b"another-secret");
        assert_eq!(
            rotated.verify(token.as_str(), t0()),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn forged_expired_token_reports_bad_signature_not_expiry() {
        let forged = Hs256TokenService::new(b"attacker")
            .issue("alice", t0() - Duration::days(2))
            .unwrap();
        assert_eq!(
            service().verify(forged.as_str(), t0()),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn garbage_and_empty_tokens_are_malformed() {
        let svc = service();
        for token in ["", "abc", "a.b", "a.b.c", "not a token at all"] {
            assert!(
                matches!(svc.verify(token, t0()), Err(TokenError::Malformed(_))),
                "expected Malformed for {token:?}"
            );
        }
    }

    #[test]
    fn foreign_algorithm_is_malformed() {
        let claims = SessionClaims::new("alice", t0(), Duration::hours(1)).unwrap();
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(matches!(
            service().verify(&token, t0()),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn trailing_character_breaks_signature() {
        let svc = service();
        let token = svc.issue("alice", t0()).unwrap();
        let tampered = format!("{token}x");
        assert_eq!(svc.verify(&tampered, t0()), Err(TokenError::BadSignature));
    }

    #[test]
    fn debug_does_not_leak_keys() {
        let rendered = format!("{:?}", service());
        assert!(rendered.starts_with("Hs256TokenService"));
        assert!(!rendered.contains("test-secret"));
    }

    fn token_alphabet() -> Vec<char> {
        ('A'..='Z')
            .chain('a'..='z')
            .chain('0'..='9')
            .chain(['-', '_', '.', '='])
            .collect()
    }

    proptest! {
        #[test]
        fn any_single_character_mutation_is_rejected(
            idx in any::<prop::sample::Index>(),
            replacement in prop::sample::select(token_alphabet()),
        ) {
            let svc = service();
            let token = svc.issue("alice", t0()).unwrap();

            let mut chars: Vec<char> = token.as_str().chars().collect();
            let i = idx.index(chars.len());
            prop_assume!(chars[i] != replacement);
            chars[i] = replacement;
            let mutated: String = chars.into_iter().collect();

            let result = svc.verify(&mutated, t0());
            prop_assert!(
                matches!(result, Err(TokenError::Malformed(_)) | Err(TokenError::BadSignature)),
                "mutation at {} accepted or misclassified: {:?}", i, result
            );
        }
    }
}
