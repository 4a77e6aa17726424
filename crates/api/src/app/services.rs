use std::sync::Arc;

use chrono::Duration;

use keygate_auth::{
    AuthenticationService, Hs256TokenService, IdentityLookupService, RegistrationService,
    TokenError, TokenVerifier,
};
use keygate_infra::{accounts::InMemoryAccountStore, credential_store::InMemoryCredentialStore};

/// Everything the handlers need, constructed once at startup.
///
/// The stores are explicit objects injected into the services; there is no
/// ambient global state.
pub struct AppServices {
    pub credentials: Arc<InMemoryCredentialStore>,
    pub tokens: Arc<Hs256TokenService>,
    pub registration: RegistrationService,
    pub authentication: AuthenticationService,
    pub identity: IdentityLookupService,
    pub accounts: Arc<InMemoryAccountStore>,
}

impl AppServices {
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Result<Self, TokenError> {
        let credentials = Arc::new(InMemoryCredentialStore::new());
        let tokens = Arc::new(Hs256TokenService::with_ttl(jwt_secret, token_ttl)?);

        Ok(Self {
            registration: RegistrationService::new(credentials.clone()),
            authentication: AuthenticationService::new(credentials.clone(), tokens.clone()),
            identity: IdentityLookupService::new(credentials.clone(), tokens.clone()),
            accounts: Arc::new(InMemoryAccountStore::new()),
            credentials,
            tokens,
        })
    }

    pub fn verifier(&self) -> Arc<dyn TokenVerifier> {
        self.tokens.clone()
    }
}
