use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header::ToStrError},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use keygate_auth::TokenVerifier;

use crate::app::errors::json_error;
use crate::context::PrincipalContext;

/// Header carrying a raw session token.
pub const TOKEN_HEADER: &str = "token";

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = match extract_token(req.headers()) {
        Ok(Some(t)) if !t.is_empty() => t,
        Ok(_) => {
            return Err(json_error(
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "Token is required.",
            ));
        }
        Err(e) => {
            tracing::warn!(error = %e, "unreadable token header on protected route");
            return Err(invalid_token());
        }
    };

    let claims = state.verifier.verify(token, Utc::now()).map_err(|e| {
        tracing::warn!(error = %e, "rejected token on protected route");
        invalid_token()
    })?;

    req.extensions_mut()
        .insert(PrincipalContext::new(claims.username));

    Ok(next.run(req).await)
}

fn invalid_token() -> Response {
    json_error(StatusCode::UNAUTHORIZED, "invalid_token", "Invalid token.")
}

/// Session token from the `token` header, else from `Authorization: Bearer`.
///
/// A header that is present but not valid UTF-8 is an error: a token was
/// supplied, it just cannot be read.
pub fn extract_token(headers: &HeaderMap) -> Result<Option<&str>, ToStrError> {
    if let Some(raw) = headers.get(TOKEN_HEADER) {
        return raw.to_str().map(|t| Some(t.trim()));
    }

    let Some(header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    Ok(header.to_str()?.strip_prefix("Bearer ").map(str::trim))
}
