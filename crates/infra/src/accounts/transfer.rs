use serde::Serialize;
use thiserror::Error;

use keygate_core::AccountId;

use super::{Account, AccountStoreError, InMemoryAccountStore};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("transfer amount must be positive (got {0})")]
    InvalidAmount(i64),

    #[error("source and destination accounts are the same")]
    SameAccount,

    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    #[error("insufficient funds in {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account: AccountId,
        balance: i64,
        requested: i64,
    },

    #[error("balance overflow in {0}")]
    Overflow(AccountId),

    #[error("account store error: {0}")]
    Store(String),
}

impl From<AccountStoreError> for TransferError {
    fn from(value: AccountStoreError) -> Self {
        match value {
            AccountStoreError::NotFound(id) => Self::AccountNotFound(id),
            other => Self::Store(other.to_string()),
        }
    }
}

/// Post-transfer state of both legs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    pub from: Account,
    pub to: Account,
    pub amount: i64,
}

/// Move `amount` from one account to another as a single unit of work.
///
/// Steps: load both, debit, credit, commit. Any failing step drops the unit of
/// work, so neither balance changes.
pub fn transfer(
    store: &InMemoryAccountStore,
    from: AccountId,
    to: AccountId,
    amount: i64,
) -> Result<TransferReceipt, TransferError> {
    if amount <= 0 {
        return Err(TransferError::InvalidAmount(amount));
    }
    if from == to {
        return Err(TransferError::SameAccount);
    }

    let mut uow = store.unit_of_work()?;

    let mut source = uow.load(from)?;
    let mut dest = uow.load(to)?;

    source.balance = source
        .balance
        .checked_sub(amount)
        .filter(|b| *b >= 0)
        .ok_or(TransferError::InsufficientFunds {
            account: from,
            balance: source.balance,
            requested: amount,
        })?;
    uow.stage(source.clone())?;

    dest.balance = dest
        .balance
        .checked_add(amount)
        .ok_or(TransferError::Overflow(to))?;
    uow.stage(dest.clone())?;

    uow.commit();
    tracing::info!(%from, %to, amount, "transfer committed");

    Ok(TransferReceipt {
        from: source,
        to: dest,
        amount,
    })
}
