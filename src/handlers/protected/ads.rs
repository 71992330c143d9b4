// handlers/protected/ads.rs - POST /api/v1/ads handler

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::database::{models::MAX_PRICE, NewAd};
use crate::error::ApiError;
use crate::handlers::{char_len_between, decode_json, with_deadline};
use crate::middleware::AuthUser;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdRequest {
    pub title: String,
    pub description: String,
    pub image_url: String,
    // JSON numbers only; a quoted price is a malformed body.
    #[serde(deserialize_with = "rust_decimal::serde::float::deserialize")]
    pub price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct AdResponse {
    pub id: i64,
}

pub fn validate_ad(req: &AdRequest) -> Result<(), ApiError> {
    if !char_len_between(&req.title, 3, 100) {
        return Err(ApiError::bad_request("Title must be between 3 and 100 characters"));
    }
    if !char_len_between(&req.description, 10, 1000) {
        return Err(ApiError::bad_request(
            "Description must be between 10 and 1000 characters",
        ));
    }
    if req.image_url.chars().count() > 255 || !req.image_url.starts_with("http") {
        return Err(ApiError::bad_request("Invalid image URL"));
    }
    if req.price < Decimal::ZERO || req.price > MAX_PRICE {
        return Err(ApiError::bad_request("Price must be between 0 and 1,000,000"));
    }
    Ok(())
}

/// POST /api/v1/ads - Create an ad owned by the authenticated user
///
/// Input:  { "title", "description", "image_url", "price" }
/// Output: 201 { "id": 1 }
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    body: Bytes,
) -> Result<(StatusCode, Json<AdResponse>), ApiError> {
    let req: AdRequest = decode_json(&body)?;
    validate_ad(&req)?;

    let ad = NewAd {
        user_id: user.user_id,
        title: req.title,
        description: req.description,
        image_url: req.image_url,
        price: req.price,
    };

    let id = with_deadline(state.request_timeout, state.service.create_ad(ad))
        .await
        .map_err(|e| {
            tracing::error!(user_id = user.user_id, error = %e, "Creating ad failed");
            ApiError::internal_server_error("Failed to create ad")
        })?;

    Ok((StatusCode::CREATED, Json(AdResponse { id })))
}
