//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: store + token service wiring shared by all handlers
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use keygate_auth::TokenError;

use crate::config::ServerConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Fails if `config.token_ttl` is outside the accepted token lifetime.
pub fn build_app(config: &ServerConfig) -> Result<Router, TokenError> {
    let services = Arc::new(services::AppServices::new(
        config.jwt_secret.as_bytes(),
        config.token_ttl,
    )?);
    Ok(build_app_with(services))
}

/// Build the router around already-constructed services.
pub fn build_app_with(services: Arc<services::AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        verifier: services.verifier(),
    };

    // Protected routes: require a verified session token.
    let protected = routes::protected_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
