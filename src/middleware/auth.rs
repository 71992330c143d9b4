use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;

use crate::app::AppState;
use crate::auth::{extract_token, TokenError};
use crate::error::ApiError;

/// Identity attached by `require_auth`. Handlers take it as a typed
/// argument; a handler reached without it answers 401.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Auth Gate for protected routes: verifies the session token and injects
/// the authenticated identity into the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = extract_token(request.headers())
        .and_then(|token| state.tokens.verify(token))
        .map_err(|e| {
            if let TokenError::InvalidToken(inner) = &e {
                tracing::warn!(error = %inner, "Rejected session token");
            }
            ApiError::from(e)
        })?;

    request.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| ApiError::unauthorized("User not authenticated"))
    }
}

/// Optional identity for public routes. A missing or invalid token yields an
/// anonymous viewer rather than a rejection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewer(pub Option<i64>);

#[async_trait]
impl FromRequestParts<AppState> for Viewer {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(Viewer(Some(user.user_id)));
        }

        let user_id = extract_token(&parts.headers)
            .ok()
            .and_then(|token| state.tokens.verify(token).ok());
        Ok(Viewer(user_id))
    }
}
