use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "classifieds-api",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "register": "POST /api/v1/register (public)",
            "login": "POST /api/v1/login (public)",
            "list_ads": "GET /api/v1/ads (public, optional bearer token)",
            "create_ad": "POST /api/v1/ads (bearer token required)",
            "health": "GET /health",
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.service.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
