use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;

use keygate_auth::LookupError;

use crate::app::{dto, errors, services::AppServices};
use crate::middleware::extract_token;

pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    body: Option<Json<dto::CredentialsRequest>>,
) -> axum::response::Response {
    let (username, password) = body.map(|Json(b)| b).unwrap_or_default().into_parts();

    match services.registration.register(&username, &password) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "You are signed up." })),
        )
            .into_response(),
        Err(e) => errors::registration_error_to_response(e),
    }
}

pub async fn signin(
    Extension(services): Extension<Arc<AppServices>>,
    body: Option<Json<dto::CredentialsRequest>>,
) -> axum::response::Response {
    let (username, password) = body.map(|Json(b)| b).unwrap_or_default().into_parts();

    match services
        .authentication
        .authenticate(&username, &password, Utc::now())
    {
        Ok(token) => (StatusCode::OK, Json(json!({ "token": token }))).into_response(),
        Err(e) => errors::authentication_error_to_response(e),
    }
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let token = match extract_token(&headers) {
        Ok(token) => token,
        Err(_) => return errors::lookup_error_to_response(LookupError::InvalidToken),
    };

    match services.identity.who_am_i(token, Utc::now()) {
        Ok(principal) => (StatusCode::OK, Json(principal)).into_response(),
        Err(e) => errors::lookup_error_to_response(e),
    }
}
