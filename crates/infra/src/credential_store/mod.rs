//! Credential store adapters.
//!
//! Implementations of `keygate_auth::CredentialStore`. Only the in-memory
//! adapter exists today; a persistent one must keep the same check-then-insert
//! atomicity across its storage boundary.

pub mod in_memory;

pub use in_memory::InMemoryCredentialStore;
