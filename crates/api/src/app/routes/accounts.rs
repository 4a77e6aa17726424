use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use keygate_core::AccountId;
use keygate_infra::accounts::{self, Account};

use crate::app::{dto, errors, services::AppServices};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_accounts).post(open_account))
        .route("/transfer", post(post_transfer))
        .route("/:id", get(get_account))
}

pub async fn list_accounts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.accounts.list_by_owner(principal.username()) {
        Ok(items) => (StatusCode::OK, Json(json!({ "items": items }))).into_response(),
        Err(e) => errors::account_error_to_response(e),
    }
}

pub async fn open_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Option<Json<dto::OpenAccountRequest>>,
) -> axum::response::Response {
    let body = body.map(|Json(b)| b).unwrap_or_default();

    match services
        .accounts
        .open(principal.username(), body.initial_balance)
    {
        Ok(account) => (StatusCode::CREATED, Json(account)).into_response(),
        Err(e) => errors::account_error_to_response(e),
    }
}

pub async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_account_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let account = match services.accounts.get(id) {
        Ok(a) => a,
        Err(e) => return errors::account_error_to_response(e),
    };

    if let Err(resp) = ensure_owner(&principal, &account) {
        return resp;
    }

    (StatusCode::OK, Json(account)).into_response()
}

pub async fn post_transfer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Option<Json<dto::TransferRequest>>,
) -> axum::response::Response {
    let Some(Json(body)) = body else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            "from, to and amount are required.",
        );
    };

    let from = match parse_account_id(&body.from) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let to = match parse_account_id(&body.to) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    // Only the owner may move money out of an account.
    let source = match services.accounts.get(from) {
        Ok(a) => a,
        Err(e) => return errors::account_error_to_response(e),
    };
    if let Err(resp) = ensure_owner(&principal, &source) {
        return resp;
    }

    match accounts::transfer(&services.accounts, from, to, body.amount) {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(e) => errors::transfer_error_to_response(e),
    }
}

fn parse_account_id(raw: &str) -> Result<AccountId, axum::response::Response> {
    raw.parse::<AccountId>()
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
}

fn ensure_owner(
    principal: &PrincipalContext,
    account: &Account,
) -> Result<(), axum::response::Response> {
    if account.owner != principal.username() {
        return Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "account belongs to another user",
        ));
    }
    Ok(())
}
