use serde::Serialize;

use keygate_core::{DomainResult, require_non_empty};

/// A registered identity.
///
/// The credential secret is kept verbatim (no hashing). A hardened deployment
/// would swap in a salted one-way hash inside the credential store without
/// touching this type's public shape.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// Unique, case-sensitive identifier.
    pub username: String,

    /// Password as presented at registration.
    pub credential_secret: String,
}

impl Principal {
    pub fn new(username: impl Into<String>, credential_secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            credential_secret: credential_secret.into(),
        }
    }
}

// Secrets must never reach logs through `{:?}`.
impl core::fmt::Debug for Principal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Principal")
            .field("username", &self.username)
            .field("credential_secret", &"<redacted>")
            .finish()
    }
}

/// Username/password pair as presented by a caller, checked for completeness.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Both fields are required; an empty string counts as absent.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> DomainResult<Self> {
        let username = username.into();
        let password = password.into();
        require_non_empty("username", &username)?;
        require_non_empty("password", &password)?;
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn into_principal(self) -> Principal {
        Principal::new(self.username, self.password)
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
