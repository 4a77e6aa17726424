use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::TokenError;

/// Session token claims (transport-agnostic).
///
/// Serialized with the registered JWT names `iat`/`exp` in whole Unix seconds,
/// so tokens stay readable by any standard JWT tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Username of the authenticated principal.
    pub username: String,

    /// Issued-at timestamp.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    /// Claims valid for `ttl` starting at `now`.
    ///
    /// Timestamps are truncated to whole seconds to match their wire form.
    pub fn new(
        username: impl Into<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let issued_at = now.trunc_subsecs(0);
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Encoding("expiry is out of range".to_string()))?;

        Ok(Self {
            username: username.into(),
            issued_at,
            expires_at,
        })
    }
}

/// Deterministically validate session claims against `now`.
///
/// Note: this validates the *claims* only. Call it after the signature has been
/// verified, so a tampered token never reports `Expired`.
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenError::Malformed(
            "invalid time window (exp <= iat)".to_string(),
        ));
    }
    if now > claims.expires_at {
        return Err(TokenError::Expired);
    }
    Ok(())
}
