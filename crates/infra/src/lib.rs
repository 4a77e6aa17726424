//! Infrastructure layer: store adapters behind the domain traits.

pub mod accounts;
pub mod credential_store;

#[cfg(test)]
mod integration_tests;
