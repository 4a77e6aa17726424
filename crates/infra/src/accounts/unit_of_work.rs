use std::collections::HashMap;
use std::sync::RwLockWriteGuard;

use keygate_core::AccountId;

use super::{Account, AccountStoreError};

/// A scoped set of staged account writes.
///
/// Writes are invisible to everyone until [`UnitOfWork::commit`]. Dropping the
/// unit of work without committing discards them (rollback).
pub struct UnitOfWork<'a> {
    accounts: RwLockWriteGuard<'a, HashMap<AccountId, Account>>,
    staged: HashMap<AccountId, Account>,
}

impl<'a> UnitOfWork<'a> {
    pub(crate) fn new(accounts: RwLockWriteGuard<'a, HashMap<AccountId, Account>>) -> Self {
        Self {
            accounts,
            staged: HashMap::new(),
        }
    }

    /// Current view of an account, including writes staged in this unit.
    pub fn load(&self, id: AccountId) -> Result<Account, AccountStoreError> {
        self.staged
            .get(&id)
            .or_else(|| self.accounts.get(&id))
            .cloned()
            .ok_or(AccountStoreError::NotFound(id))
    }

    /// Stage a write of an account previously obtained from [`UnitOfWork::load`].
    pub fn stage(&mut self, account: Account) -> Result<(), AccountStoreError> {
        if !self.accounts.contains_key(&account.id) {
            return Err(AccountStoreError::NotFound(account.id));
        }
        self.staged.insert(account.id, account);
        Ok(())
    }

    /// Publish every staged write at once. Returns the number of accounts written.
    pub fn commit(mut self) -> usize {
        let written = self.staged.len();
        for (id, account) in self.staged.drain() {
            self.accounts.insert(id, account);
        }
        written
    }
}

impl Drop for UnitOfWork<'_> {
    fn drop(&mut self) {
        if !self.staged.is_empty() {
            tracing::debug!(discarded = self.staged.len(), "unit of work rolled back");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::accounts::InMemoryAccountStore;

    #[test]
    fn dropped_unit_of_work_rolls_back() {
        let store = InMemoryAccountStore::new();
        let acc = store.open("alice", 100).unwrap();

        {
            let mut uow = store.unit_of_work().unwrap();
            let mut a = uow.load(acc.id).unwrap();
            a.balance = 0;
            uow.stage(a).unwrap();
            assert_eq!(uow.load(acc.id).unwrap().balance, 0);
        }

        assert_eq!(store.get(acc.id).unwrap().balance, 100);
    }

    #[test]
    fn committed_unit_of_work_is_visible() {
        let store = InMemoryAccountStore::new();
        let acc = store.open("alice", 100).unwrap();

        let mut uow = store.unit_of_work().unwrap();
        let mut a = uow.load(acc.id).unwrap();
        a.balance = 42;
        uow.stage(a).unwrap();
        assert_eq!(uow.commit(), 1);

        assert_eq!(store.get(acc.id).unwrap().balance, 42);
    }

    #[test]
    fn staging_unknown_account_fails() {
        let store = InMemoryAccountStore::new();
        let acc = store.open("alice", 1).unwrap();
        let mut uow = store.unit_of_work().unwrap();

        let mut ghost = uow.load(acc.id).unwrap();
        ghost.id = keygate_core::AccountId::new();
        assert!(uow.stage(ghost).is_err());
    }
}
