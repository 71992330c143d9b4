use async_trait::async_trait;
use thiserror::Error;

use super::models::{Ad, AdQuery, NewAd};

/// Classified persistence failures. Callers branch on the variant, never on
/// the message text.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("login already exists")]
    DuplicateLogin,

    #[error("invalid login or password")]
    InvalidCredentials,

    #[error("user with ID {0} does not exist")]
    UnknownUser(i64),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Data access used by the domain service. Every method is a single round
/// trip to the store.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn register_user(&self, login: &str, password: &str) -> Result<i64, StorageError>;

    async fn check_user(&self, login: &str, password: &str) -> Result<i64, StorageError>;

    async fn create_ad(&self, ad: &NewAd) -> Result<i64, StorageError>;

    /// One page of ads joined with owner login. Paging is normalized first.
    async fn list_ads(&self, query: &AdQuery) -> Result<Vec<Ad>, StorageError>;

    async fn is_ad_owner(&self, ad_id: i64, user_id: i64) -> Result<bool, StorageError>;

    async fn ping(&self) -> Result<(), StorageError>;
}
