use axum::{
    handler::Handler,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::TokenKeys;
use crate::config::AppConfig;
use crate::database::Storage;
use crate::handlers::{protected, public, system};
use crate::middleware::require_auth;
use crate::services::AdService;

/// Upper bound on a whole HTTP exchange. Slower requests get 408.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared request state. Cloned per request, so everything behind it is
/// either `Arc` or cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AdService>,
    pub tokens: TokenKeys,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(config: &AppConfig, storage: Arc<dyn Storage>) -> Self {
        Self::from_parts(
            storage,
            TokenKeys::new(&config.security),
            Duration::from_secs(config.api.request_timeout_secs),
        )
    }

    pub fn from_parts(storage: Arc<dyn Storage>, tokens: TokenKeys, request_timeout: Duration) -> Self {
        Self {
            service: Arc::new(AdService::new(storage, tokens.clone())),
            tokens,
            request_timeout,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let auth_gate = middleware::from_fn_with_state(state.clone(), require_auth);

    let api = Router::new()
        // Public auth routes
        .route("/register", post(public::auth::register))
        .route("/login", post(public::auth::login))
        // Listing is public; creating requires a session token
        .route(
            "/ads",
            get(public::ads::list).post(protected::ads::create.layer(auth_gate)),
        );

    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .nest("/api/v1", api)
        .layer(TimeoutLayer::new(HTTP_TIMEOUT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
