//! Integration tests for the credential lifecycle.
//!
//! Tests: register → authenticate → verify token → identity lookup, wired over
//! the in-memory credential store and the HS256 token service.
//!
//! Verifies:
//! - Usernames are unique, including under concurrent registration
//! - Unknown users and wrong passwords fail identically
//! - Token-layer failures collapse to `InvalidToken` at lookup

use std::sync::{Arc, Barrier};

use chrono::{DateTime, Duration, TimeZone, Utc};

use keygate_auth::{
    AuthenticationError, AuthenticationService, CredentialStore, Hs256TokenService,
    IdentityLookupService, LookupError, Principal, RegistrationError, RegistrationService,
    TokenIssuer, TokenVerifier,
};

use crate::credential_store::InMemoryCredentialStore;

struct Harness {
    store: Arc<InMemoryCredentialStore>,
    tokens: Arc<Hs256TokenService>,
    registration: RegistrationService,
    authentication: AuthenticationService,
    identity: IdentityLookupService,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryCredentialStore::new());
    let tokens = Arc::new(Hs256TokenService::new(b"integration-secret"));
    Harness {
        registration: RegistrationService::new(store.clone()),
        authentication: AuthenticationService::new(store.clone(), tokens.clone()),
        identity: IdentityLookupService::new(store.clone(), tokens.clone()),
        store,
        tokens,
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
}

#[test]
fn registering_twice_conflicts() {
    let h = harness();
    assert_eq!(h.registration.register("alice", "secret1"), Ok(()));
    assert_eq!(
        h.registration.register("alice", "other"),
        Err(RegistrationError::AlreadyExists)
    );
    assert_eq!(h.store.len().unwrap(), 1);
}

#[test]
fn incomplete_registration_inserts_nothing() {
    let h = harness();
    for (u, p) in [("", "pw"), ("alice", ""), ("", "")] {
        assert!(matches!(
            h.registration.register(u, p),
            Err(RegistrationError::InvalidInput(_))
        ));
    }
    assert!(h.store.is_empty().unwrap());
}

#[test]
fn authenticated_token_verifies_for_same_user() {
    let h = harness();
    h.registration.register("alice", "secret1").unwrap();

    let token = h.authentication.authenticate("alice", "secret1", t0()).unwrap();
    let claims = h.tokens.verify(token.as_str(), t0()).unwrap();
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.expires_at - claims.issued_at, Duration::hours(1));
}

#[test]
fn wrong_password_and_unknown_user_are_indistinguishable() {
    let h = harness();
    h.registration.register("alice", "secret1").unwrap();

    let wrong_password = h.authentication.authenticate("alice", "nope", t0());
    let unknown_user = h.authentication.authenticate("mallory", "secret1", t0());

    assert_eq!(wrong_password, Err(AuthenticationError::InvalidCredentials));
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(
        wrong_password.unwrap_err().to_string(),
        "invalid username or password"
    );
}

#[test]
fn end_to_end_alice_scenario() {
    let h = harness();

    assert_eq!(h.registration.register("alice", "secret1"), Ok(()));
    assert_eq!(
        h.registration.register("alice", "other"),
        Err(RegistrationError::AlreadyExists)
    );

    let token = h.authentication.authenticate("alice", "secret1", t0()).unwrap();

    let me = h.identity.who_am_i(Some(token.as_str()), t0()).unwrap();
    assert_eq!(me, Principal::new("alice", "secret1"));

    assert_eq!(h.identity.who_am_i(Some(""), t0()), Err(LookupError::MissingToken));
    assert_eq!(h.identity.who_am_i(None, t0()), Err(LookupError::MissingToken));

    let tampered = format!("{token}a");
    assert_eq!(
        h.identity.who_am_i(Some(&tampered), t0()),
        Err(LookupError::InvalidToken)
    );
}

#[test]
fn expired_token_is_invalid_at_lookup() {
    let h = harness();
    h.registration.register("alice", "secret1").unwrap();
    let token = h.authentication.authenticate("alice", "secret1", t0()).unwrap();

    assert!(
        h.identity
            .who_am_i(Some(token.as_str()), t0() + Duration::minutes(59))
            .is_ok()
    );
    assert_eq!(
        h.identity
            .who_am_i(Some(token.as_str()), t0() + Duration::minutes(61)),
        Err(LookupError::InvalidToken)
    );
}

#[test]
fn valid_token_for_unregistered_user_is_principal_not_found() {
    let h = harness();
    // Signed with the shared secret, but no such principal was ever stored.
    let token = h.tokens.issue("ghost", t0()).unwrap();

    assert_eq!(
        h.identity.who_am_i(Some(token.as_str()), t0()),
        Err(LookupError::PrincipalNotFound)
    );
}

#[test]
fn concurrent_registration_admits_exactly_one() {
    const N: usize = 32;

    let h = Arc::new(harness());
    let barrier = Arc::new(Barrier::new(N));

    let handles: Vec<_> = (0..N)
        .map(|_| {
            let h = h.clone();
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                barrier.wait();
                h.registration.register("bob", "x")
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|t| t.join().unwrap()).collect();

    let ok = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| **r == Err(RegistrationError::AlreadyExists))
        .count();
    assert_eq!(ok, 1);
    assert_eq!(conflicts, N - 1);
    assert_eq!(h.store.find_by_username("bob").unwrap().credential_secret, "x");
}
