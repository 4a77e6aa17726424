//! In-memory account ledger with unit-of-work transfers.
//!
//! Balances are integers in the smallest currency unit. A transfer either
//! applies both legs or neither: see [`UnitOfWork`].

pub mod in_memory;
pub mod transfer;
pub mod unit_of_work;

use serde::Serialize;
use thiserror::Error;

use keygate_core::AccountId;

pub use in_memory::InMemoryAccountStore;
pub use transfer::{TransferError, TransferReceipt, transfer};
pub use unit_of_work::UnitOfWork;

/// A balance-holding account owned by a registered username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: AccountId,
    pub owner: String,
    pub balance: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountStoreError {
    #[error("account {0} not found")]
    NotFound(AccountId),

    #[error("initial balance must not be negative (got {0})")]
    NegativeBalance(i64),

    #[error("account store unavailable: {0}")]
    Unavailable(String),
}
