// handlers/public/auth/login.rs - POST /api/v1/login handler

use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::{decode_json, with_deadline};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/v1/login - Authenticate and receive a session token
///
/// Every downstream failure answers 401, so bad credentials and an
/// unavailable store look the same to the client. The cause is logged.
pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Json<LoginResponse>, ApiError> {
    let req: LoginRequest = decode_json(&body)?;
    if req.login.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Login and password are required"));
    }

    let token = with_deadline(
        state.request_timeout,
        state.service.login_user(&req.login, &req.password),
    )
    .await
    .map_err(|e| {
        tracing::warn!(login = %req.login, error = %e, "Login failed");
        ApiError::unauthorized("Invalid login or password")
    })?;

    Ok(Json(LoginResponse { token }))
}
