use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use keygate_core::DomainError;

use crate::{
    CredentialStore, CredentialStoreError, Credentials, SessionToken, TokenError, TokenIssuer,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unknown username and wrong password are deliberately indistinguishable.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("token issuance failed: {0}")]
    Token(#[from] TokenError),

    #[error("credential store error: {0}")]
    Store(String),
}

impl From<DomainError> for AuthenticationError {
    fn from(value: DomainError) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

/// Checks presented credentials and mints a session token on success.
#[derive(Clone)]
pub struct AuthenticationService {
    store: Arc<dyn CredentialStore>,
    issuer: Arc<dyn TokenIssuer>,
}

impl AuthenticationService {
    pub fn new(store: Arc<dyn CredentialStore>, issuer: Arc<dyn TokenIssuer>) -> Self {
        Self { store, issuer }
    }

    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, AuthenticationError> {
        // Input is checked before the store is touched.
        let credentials = Credentials::new(username, password)?;

        let principal = match self
            .store
            .find_by_username_and_secret(credentials.username(), credentials.password())
        {
            Ok(p) => p,
            Err(CredentialStoreError::NotFound) => {
                tracing::warn!(username, "authentication failed");
                return Err(AuthenticationError::InvalidCredentials);
            }
            Err(e) => return Err(AuthenticationError::Store(e.to_string())),
        };

        let token = self.issuer.issue(&principal.username, now)?;
        tracing::info!(username = %principal.username, "session token issued");
        Ok(token)
    }
}
