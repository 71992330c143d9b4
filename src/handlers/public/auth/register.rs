// handlers/public/auth/register.rs - POST /api/v1/register handler

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::database::StorageError;
use crate::error::ApiError;
use crate::handlers::{char_len_between, decode_json, with_deadline};
use crate::services::ServiceError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user_id: i64,
}

/// Login: 3-50 characters of `[A-Za-z0-9_]`. Password: 6-255 characters.
pub fn validate_registration(req: &RegisterRequest) -> Result<(), ApiError> {
    if !char_len_between(&req.login, 3, 50) {
        return Err(ApiError::bad_request("Login must be between 3 and 50 characters"));
    }
    if !char_len_between(&req.password, 6, 255) {
        return Err(ApiError::bad_request("Password must be between 6 and 255 characters"));
    }
    if !req.login.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ApiError::bad_request(
            "Login must contain only letters, numbers, or underscores",
        ));
    }
    Ok(())
}

/**
 * POST /api/v1/register - Register new user account
 *
 * Input:  { "login": "alice", "password": "secret1" }
 * Output: 201 { "message": "User created successfully", "user_id": 1 }
 *
 * 400 on a malformed body or invalid login/password, 409 when the login is
 * taken, 500 on any other failure.
 */
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let req: RegisterRequest = decode_json(&body)?;
    validate_registration(&req)?;

    let result = with_deadline(
        state.request_timeout,
        state.service.register_user(&req.login, &req.password),
    )
    .await;

    match result {
        Ok(user_id) => Ok((
            StatusCode::CREATED,
            Json(RegisterResponse {
                message: "User created successfully",
                user_id,
            }),
        )),
        Err(ServiceError::Storage(StorageError::DuplicateLogin)) => {
            Err(ApiError::conflict("Login already exists"))
        }
        Err(e) => {
            tracing::error!(error = %e, "Registration failed");
            Err(ApiError::internal_server_error("Failed to create user"))
        }
    }
}
