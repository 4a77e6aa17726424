use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{CredentialStore, CredentialStoreError, Principal, TokenVerifier};

/// Token-layer causes (malformed, bad signature, expired) collapse into
/// `InvalidToken`; callers only need to know they must re-authenticate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("token is required")]
    MissingToken,

    #[error("invalid token")]
    InvalidToken,

    #[error("user not found")]
    PrincipalNotFound,

    #[error("credential store error: {0}")]
    Store(String),
}

/// Resolves the current principal behind a session token.
#[derive(Clone)]
pub struct IdentityLookupService {
    store: Arc<dyn CredentialStore>,
    verifier: Arc<dyn TokenVerifier>,
}

impl IdentityLookupService {
    pub fn new(store: Arc<dyn CredentialStore>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { store, verifier }
    }

    /// An absent or empty token is `MissingToken`.
    ///
    /// The returned record includes the stored secret.
    pub fn who_am_i(
        &self,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Principal, LookupError> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(LookupError::MissingToken),
        };

        let claims = self.verifier.verify(token, now).map_err(|e| {
            tracing::warn!(error = %e, "token rejected");
            LookupError::InvalidToken
        })?;

        match self.store.find_by_username(&claims.username) {
            Ok(principal) => Ok(principal),
            Err(CredentialStoreError::NotFound) => Err(LookupError::PrincipalNotFound),
            Err(e) => Err(LookupError::Store(e.to_string())),
        }
    }
}
