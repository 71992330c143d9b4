// handlers/public/ads.rs - GET /api/v1/ads handler

use axum::{
    extract::{Query, State},
    Json,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use crate::app::AppState;
use crate::database::{Ad, AdQuery, SortDirection, SortField};
use crate::error::ApiError;
use crate::handlers::with_deadline;
use crate::middleware::Viewer;

fn parse_param<T: FromStr>(params: &HashMap<String, String>, key: &str) -> Option<T> {
    params.get(key).and_then(|v| v.trim().parse().ok())
}

/// Build the listing query from raw parameters. Unparsable values keep their
/// defaults; range clamping is left to the persistence layer.
pub fn ad_query_from_params(params: &HashMap<String, String>) -> AdQuery {
    let mut query = AdQuery::default();

    if let Some(page) = parse_param::<i64>(params, "page") {
        query.page = page;
    }
    if let Some(page_size) = parse_param::<i64>(params, "page_size") {
        query.page_size = page_size;
    }
    if let Some(min_price) = parse_param::<Decimal>(params, "min_price") {
        query.min_price = min_price;
    }
    if let Some(max_price) = parse_param::<Decimal>(params, "max_price") {
        query.max_price = max_price;
    }
    query.sort_by = params
        .get("sort_by")
        .and_then(|v| SortField::parse(v))
        .unwrap_or_default();
    query.sort_order = params
        .get("sort_order")
        .and_then(|v| SortDirection::parse(v))
        .unwrap_or_default();

    query
}

/// GET /api/v1/ads - page, page_size, sort_by, sort_order, min_price, max_price
pub async fn list(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Ad>>, ApiError> {
    let query = ad_query_from_params(&params);

    let ads = with_deadline(state.request_timeout, state.service.list_ads(query, viewer))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Listing ads failed");
            ApiError::internal_server_error("Failed to get ads")
        })?;

    Ok(Json(ads))
}
