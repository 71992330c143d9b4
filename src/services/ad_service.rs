use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::auth::{TokenError, TokenKeys};
use crate::database::{Ad, AdQuery, NewAd, Storage, StorageError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("request deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

/// Use cases of the classifieds backend. Validation happens in the handlers;
/// this layer orchestrates storage calls and issues session tokens.
pub struct AdService {
    storage: Arc<dyn Storage>,
    tokens: TokenKeys,
}

impl AdService {
    pub fn new(storage: Arc<dyn Storage>, tokens: TokenKeys) -> Self {
        Self { storage, tokens }
    }

    pub async fn register_user(&self, login: &str, password: &str) -> Result<i64, ServiceError> {
        tracing::info!(login, "Registering user");
        let user_id = self
            .storage
            .register_user(login, password)
            .await
            .inspect_err(|e| tracing::error!(login, error = %e, "Failed to register user"))?;
        Ok(user_id)
    }

    /// Check credentials and mint a session token for the matching user.
    pub async fn login_user(&self, login: &str, password: &str) -> Result<String, ServiceError> {
        tracing::info!(login, "Authenticating user");
        let user_id = self
            .storage
            .check_user(login, password)
            .await
            .inspect_err(|e| tracing::error!(login, error = %e, "Failed to check user"))?;

        let token = self
            .tokens
            .issue(user_id)
            .inspect_err(|e| tracing::error!(user_id, error = %e, "Failed to generate token"))?;
        tracing::debug!(user_id, ttl_hours = self.tokens.ttl().num_hours(), "Generated token");
        Ok(token)
    }

    pub async fn create_ad(&self, ad: NewAd) -> Result<i64, ServiceError> {
        tracing::info!(user_id = ad.user_id, "Creating ad");
        let ad_id = self
            .storage
            .create_ad(&ad)
            .await
            .inspect_err(|e| tracing::error!(user_id = ad.user_id, error = %e, "Failed to create ad"))?;
        Ok(ad_id)
    }

    /// Fetch one page of ads. When a viewer is known, each ad is marked with
    /// whether the viewer owns it; a failed check is logged and leaves that
    /// ad's flag unset instead of failing the listing.
    pub async fn list_ads(&self, query: AdQuery, viewer: Option<i64>) -> Result<Vec<Ad>, ServiceError> {
        tracing::info!(page = query.page, page_size = query.page_size, "Fetching ads");
        let mut ads = self
            .storage
            .list_ads(&query)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to get ads"))?;

        let Some(user_id) = viewer.filter(|id| *id != 0) else {
            return Ok(ads);
        };

        for ad in &mut ads {
            match self.storage.is_ad_owner(ad.id, user_id).await {
                Ok(is_owner) => ad.is_owner = Some(is_owner),
                Err(e) => {
                    tracing::error!(ad_id = ad.id, user_id, error = %e, "Failed to check ad owner");
                }
            }
        }
        Ok(ads)
    }

    pub async fn health(&self) -> Result<(), ServiceError> {
        self.storage.ping().await?;
        Ok(())
    }
}
