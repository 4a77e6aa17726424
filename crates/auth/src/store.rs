use thiserror::Error;

use crate::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialStoreError {
    #[error("principal '{0}' already exists")]
    AlreadyExists(String),

    #[error("principal not found")]
    NotFound,

    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

/// Storage contract for registered principals.
///
/// Lookups are exact, case-sensitive string comparisons. `insert` must be
/// atomic with respect to its uniqueness check: of two concurrent inserts for
/// the same username, exactly one succeeds.
pub trait CredentialStore: Send + Sync {
    fn insert(&self, principal: Principal) -> Result<(), CredentialStoreError>;

    fn find_by_username(&self, username: &str) -> Result<Principal, CredentialStoreError>;

    /// Matches only when both the username and the stored secret are equal.
    fn find_by_username_and_secret(
        &self,
        username: &str,
        secret: &str,
    ) -> Result<Principal, CredentialStoreError>;
}
