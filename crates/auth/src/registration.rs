use std::sync::Arc;

use thiserror::Error;

use keygate_core::DomainError;

use crate::{CredentialStore, CredentialStoreError, Credentials};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("user already exists")]
    AlreadyExists,

    #[error("credential store error: {0}")]
    Store(String),
}

impl From<DomainError> for RegistrationError {
    fn from(value: DomainError) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

/// Validates and inserts new principals.
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn CredentialStore>,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Register `username` with `password` stored verbatim.
    ///
    /// Exactly one insertion on success, none on any failure.
    pub fn register(&self, username: &str, password: &str) -> Result<(), RegistrationError> {
        let credentials = Credentials::new(username, password)?;

        match self.store.insert(credentials.into_principal()) {
            Ok(()) => {
                tracing::info!(username, "principal registered");
                Ok(())
            }
            Err(CredentialStoreError::AlreadyExists(_)) => {
                tracing::debug!(username, "registration rejected: username taken");
                Err(RegistrationError::AlreadyExists)
            }
            Err(e) => Err(RegistrationError::Store(e.to_string())),
        }
    }
}
