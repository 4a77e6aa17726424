use axum::{
    Router,
    routing::{get, post},
};

pub mod accounts;
pub mod auth;
pub mod system;

/// Router for the unauthenticated credential endpoints.
///
/// `/me` checks its token itself so it can tell a missing token from an
/// invalid one and report a vanished principal.
pub fn public_router() -> Router {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/signin", post(auth::signin))
        .route("/me", get(auth::me))
}

/// Router for all endpoints behind the auth middleware.
pub fn protected_router() -> Router {
    Router::new().nest("/accounts", accounts::router())
}
