use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use keygate_auth::{AuthenticationError, LookupError, RegistrationError};
use keygate_infra::accounts::{AccountStoreError, TransferError};

pub fn registration_error_to_response(err: RegistrationError) -> axum::response::Response {
    match err {
        RegistrationError::InvalidInput(_) => json_error(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            "Username and password are required.",
        ),
        RegistrationError::AlreadyExists => {
            json_error(StatusCode::CONFLICT, "already_exists", "User already exists.")
        }
        RegistrationError::Store(msg) => store_error(msg),
    }
}

pub fn authentication_error_to_response(err: AuthenticationError) -> axum::response::Response {
    match err {
        AuthenticationError::InvalidInput(_) => json_error(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            "Username and password are required.",
        ),
        AuthenticationError::InvalidCredentials => json_error(
            StatusCode::FORBIDDEN,
            "invalid_credentials",
            "Invalid username or password.",
        ),
        AuthenticationError::Token(e) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "token_error",
            e.to_string(),
        ),
        AuthenticationError::Store(msg) => store_error(msg),
    }
}

pub fn lookup_error_to_response(err: LookupError) -> axum::response::Response {
    match err {
        LookupError::MissingToken => {
            json_error(StatusCode::UNAUTHORIZED, "missing_token", "Token is required.")
        }
        LookupError::InvalidToken => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_token", "Invalid token.")
        }
        LookupError::PrincipalNotFound => {
            json_error(StatusCode::NOT_FOUND, "principal_not_found", "User not found.")
        }
        LookupError::Store(msg) => store_error(msg),
    }
}

pub fn account_error_to_response(err: AccountStoreError) -> axum::response::Response {
    match err {
        AccountStoreError::NotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        AccountStoreError::NegativeBalance(_) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", err.to_string())
        }
        AccountStoreError::Unavailable(msg) => store_error(msg),
    }
}

pub fn transfer_error_to_response(err: TransferError) -> axum::response::Response {
    match err {
        TransferError::InvalidAmount(_)
        | TransferError::SameAccount
        | TransferError::Overflow(_) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", err.to_string())
        }
        TransferError::AccountNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        TransferError::InsufficientFunds { .. } => {
            json_error(StatusCode::CONFLICT, "insufficient_funds", err.to_string())
        }
        TransferError::Store(msg) => store_error(msg),
    }
}

fn store_error(msg: String) -> axum::response::Response {
    tracing::error!(error = %msg, "store failure");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
