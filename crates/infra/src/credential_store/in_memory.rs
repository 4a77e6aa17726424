use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::RwLock;

use keygate_auth::{CredentialStore, CredentialStoreError, Principal};

/// In-memory principal store keyed by username.
///
/// A single `RwLock` serialises inserts (so the uniqueness check and the insert
/// are one step) while letting lookups run concurrently.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    principals: RwLock<HashMap<String, Principal>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered principals.
    pub fn len(&self) -> Result<usize, CredentialStoreError> {
        let map = self.principals.read().map_err(|_| Self::poisoned())?;
        Ok(map.len())
    }

    pub fn is_empty(&self) -> Result<bool, CredentialStoreError> {
        Ok(self.len()? == 0)
    }

    fn poisoned() -> CredentialStoreError {
        CredentialStoreError::Unavailable("lock poisoned".to_string())
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn insert(&self, principal: Principal) -> Result<(), CredentialStoreError> {
        let mut map = self.principals.write().map_err(|_| Self::poisoned())?;

        match map.entry(principal.username.clone()) {
            Entry::Occupied(e) => Err(CredentialStoreError::AlreadyExists(e.key().clone())),
            Entry::Vacant(slot) => {
                tracing::debug!(username = %principal.username, "principal stored");
                slot.insert(principal);
                Ok(())
            }
        }
    }

    fn find_by_username(&self, username: &str) -> Result<Principal, CredentialStoreError> {
        let map = self.principals.read().map_err(|_| Self::poisoned())?;
        map.get(username)
            .cloned()
            .ok_or(CredentialStoreError::NotFound)
    }

    fn find_by_username_and_secret(
        &self,
        username: &str,
        secret: &str,
    ) -> Result<Principal, CredentialStoreError> {
        // Plain equality, not constant-time; see the note on `Principal`.
        let map = self.principals.read().map_err(|_| Self::poisoned())?;
        map.get(username)
            .filter(|p| p.credential_secret == secret)
            .cloned()
            .ok_or(CredentialStoreError::NotFound)
    }
}
