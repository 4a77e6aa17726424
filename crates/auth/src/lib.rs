//! `keygate-auth` — credential registration, authentication and session tokens.
//!
//! This crate is intentionally decoupled from HTTP and storage: services talk to
//! a [`CredentialStore`] trait object and take the current time as an argument.

pub mod authentication;
pub mod claims;
pub mod identity;
pub mod principal;
pub mod registration;
pub mod store;
pub mod token;

pub use authentication::{AuthenticationError, AuthenticationService};
pub use claims::{SessionClaims, validate_claims};
pub use identity::{IdentityLookupService, LookupError};
pub use principal::{Credentials, Principal};
pub use registration::{RegistrationError, RegistrationService};
pub use store::{CredentialStore, CredentialStoreError};
pub use token::{
    DEFAULT_TOKEN_TTL_SECS, Hs256TokenService, MAX_TOKEN_TTL_SECS, SessionToken, TokenError,
    TokenIssuer, TokenVerifier,
};
