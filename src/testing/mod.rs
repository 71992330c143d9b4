//! In-memory `Storage` used by unit and router tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::app::AppState;
use crate::auth::TokenKeys;
use crate::database::{Ad, AdQuery, NewAd, SortDirection, SortField, Storage, StorageError};

pub const TEST_SECRET: &[u8] = b"test-secret";

// Passwords are kept as submitted, matching the users table.
struct UserRow {
    id: i64,
    login: String,
    password: String,
}

#[derive(Default)]
struct Tables {
    users: Vec<UserRow>,
    ads: Vec<Ad>,
}

/// Mirrors the PostgreSQL constraints the service relies on: unique login
/// and the ads -> users foreign key.
#[derive(Default)]
pub struct MemoryStorage {
    tables: Mutex<Tables>,
    failing_owner_checks: Mutex<HashSet<i64>>,
    delay: Option<Duration>,
    writes: AtomicUsize,
    owner_checks: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `delay` before touching the tables.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Make `is_ad_owner` fail for the given ad.
    pub fn fail_owner_check(&self, ad_id: i64) {
        self.failing_owner_checks.lock().unwrap().insert(ad_id);
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn owner_checks(&self) -> usize {
        self.owner_checks.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn register_user(&self, login: &str, password: &str) -> Result<i64, StorageError> {
        self.pause().await;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.login == login) {
            return Err(StorageError::DuplicateLogin);
        }
        let id = tables.users.len() as i64 + 1;
        tables.users.push(UserRow {
            id,
            login: login.to_string(),
            password: password.to_string(),
        });
        Ok(id)
    }

    async fn check_user(&self, login: &str, password: &str) -> Result<i64, StorageError> {
        self.pause().await;
        let tables = self.tables.lock().unwrap();
        tables
            .users
            .iter()
            .find(|u| u.login == login && u.password == password)
            .map(|u| u.id)
            .ok_or(StorageError::InvalidCredentials)
    }

    async fn create_ad(&self, ad: &NewAd) -> Result<i64, StorageError> {
        self.pause().await;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.lock().unwrap();
        let login = tables
            .users
            .iter()
            .find(|u| u.id == ad.user_id)
            .map(|u| u.login.clone())
            .ok_or(StorageError::UnknownUser(ad.user_id))?;

        let id = tables.ads.len() as i64 + 1;
        tables.ads.push(Ad {
            id,
            title: ad.title.clone(),
            description: ad.description.clone(),
            image_url: ad.image_url.clone(),
            price: ad.price,
            user_id: ad.user_id,
            login,
            created_at: Utc::now(),
            is_owner: None,
        });
        Ok(id)
    }

    async fn list_ads(&self, query: &AdQuery) -> Result<Vec<Ad>, StorageError> {
        self.pause().await;
        let query = query.clone().normalized();
        let tables = self.tables.lock().unwrap();

        let mut ads: Vec<Ad> = tables
            .ads
            .iter()
            .filter(|ad| ad.price >= query.min_price && ad.price <= query.max_price)
            .cloned()
            .collect();

        ads.sort_by(|a, b| {
            let ordering = match query.sort_by {
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::Price => a.price.cmp(&b.price),
            }
            .then(a.id.cmp(&b.id));
            match query.sort_order {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        Ok(ads
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size as usize)
            .collect())
    }

    async fn is_ad_owner(&self, ad_id: i64, user_id: i64) -> Result<bool, StorageError> {
        self.pause().await;
        self.owner_checks.fetch_add(1, Ordering::SeqCst);
        if self.failing_owner_checks.lock().unwrap().contains(&ad_id) {
            return Err(StorageError::Database(sqlx::Error::PoolTimedOut));
        }
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .ads
            .iter()
            .any(|ad| ad.id == ad_id && ad.user_id == user_id))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

pub fn test_keys() -> TokenKeys {
    TokenKeys::from_secret(TEST_SECRET, chrono::Duration::hours(24))
}

pub fn test_state(storage: Arc<MemoryStorage>, request_timeout: Duration) -> AppState {
    AppState::from_parts(storage, test_keys(), request_timeout)
}
