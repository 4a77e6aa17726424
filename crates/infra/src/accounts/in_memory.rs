use std::collections::HashMap;
use std::sync::RwLock;

use keygate_core::AccountId;

use super::{Account, AccountStoreError, UnitOfWork};

/// In-memory account store.
///
/// Intended for tests/dev. Reads share the lock; a [`UnitOfWork`] holds the
/// write lock for its whole lifetime, so units of work never interleave.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, owner: &str, initial_balance: i64) -> Result<Account, AccountStoreError> {
        if initial_balance < 0 {
            return Err(AccountStoreError::NegativeBalance(initial_balance));
        }

        let account = Account {
            id: AccountId::new(),
            owner: owner.to_string(),
            balance: initial_balance,
        };

        let mut map = self.accounts.write().map_err(|_| poisoned())?;
        map.insert(account.id, account.clone());
        tracing::debug!(account_id = %account.id, owner, "account opened");
        Ok(account)
    }

    pub fn get(&self, id: AccountId) -> Result<Account, AccountStoreError> {
        let map = self.accounts.read().map_err(|_| poisoned())?;
        map.get(&id).cloned().ok_or(AccountStoreError::NotFound(id))
    }

    /// All accounts of `owner`, ordered by id (creation order for v7 ids).
    pub fn list_by_owner(&self, owner: &str) -> Result<Vec<Account>, AccountStoreError> {
        let map = self.accounts.read().map_err(|_| poisoned())?;
        let mut items: Vec<Account> = map.values().filter(|a| a.owner == owner).cloned().collect();
        items.sort_by_key(|a| *a.id.as_uuid());
        Ok(items)
    }

    /// Begin a unit of work. Blocks until no other unit of work is open.
    pub fn unit_of_work(&self) -> Result<UnitOfWork<'_>, AccountStoreError> {
        let guard = self.accounts.write().map_err(|_| poisoned())?;
        Ok(UnitOfWork::new(guard))
    }
}

fn poisoned() -> AccountStoreError {
    AccountStoreError::Unavailable("lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_and_get() {
        let store = InMemoryAccountStore::new();
        let acc = store.open("alice", 100).unwrap();
        assert_eq!(store.get(acc.id).unwrap(), acc);
        assert_eq!(acc.balance, 100);
    }

    #[test]
    fn negative_opening_balance_rejected() {
        let store = InMemoryAccountStore::new();
        assert_eq!(
            store.open("alice", -1),
            Err(AccountStoreError::NegativeBalance(-1))
        );
    }

    #[test]
    fn unknown_account_not_found() {
        let store = InMemoryAccountStore::new();
        let id = AccountId::new();
        assert_eq!(store.get(id), Err(AccountStoreError::NotFound(id)));
    }

    #[test]
    fn list_by_owner_filters() {
        let store = InMemoryAccountStore::new();
        let a1 = store.open("alice", 1).unwrap();
        store.open("bob", 2).unwrap();
        let a2 = store.open("alice", 3).unwrap();

        let ids: Vec<_> = store
            .list_by_owner("alice")
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a1.id) && ids.contains(&a2.id));
    }
}
