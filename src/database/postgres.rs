use async_trait::async_trait;
use sqlx::PgPool;

use super::manager;
use super::models::{Ad, AdQuery, NewAd};
use super::storage::{Storage, StorageError};

/// PostgreSQL-backed storage over a shared connection pool.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// Sort column and direction come from closed enums, so interpolating them
/// is safe; everything else is bound.
pub(crate) fn list_ads_sql(query: &AdQuery) -> String {
    let direction = query.sort_order.to_sql();
    format!(
        r#"
        SELECT a.id, a.title, a.description, a.image_url, a.price, a.user_id, u.login, a.created_at
        FROM ads a
        JOIN users u ON a.user_id = u.id
        WHERE a.price BETWEEN $1 AND $2
        ORDER BY {column} {direction}, a.id {direction}
        LIMIT $3 OFFSET $4"#,
        column = query.sort_by.column(),
        direction = direction,
    )
}

#[async_trait]
impl Storage for PgStorage {
    async fn register_user(&self, login: &str, password: &str) -> Result<i64, StorageError> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (login, password) VALUES ($1, $2) RETURNING id",
        )
        .bind(login)
        .bind(password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StorageError::DuplicateLogin
            } else {
                StorageError::Database(e)
            }
        })
    }

    async fn check_user(&self, login: &str, password: &str) -> Result<i64, StorageError> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE login = $1 AND password = $2")
            .bind(login)
            .bind(password)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::InvalidCredentials)
    }

    async fn create_ad(&self, ad: &NewAd) -> Result<i64, StorageError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO ads (title, description, image_url, price, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id"#,
        )
        .bind(&ad.title)
        .bind(&ad.description)
        .bind(&ad.image_url)
        .bind(ad.price)
        .bind(ad.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                StorageError::UnknownUser(ad.user_id)
            } else {
                StorageError::Database(e)
            }
        })
    }

    async fn list_ads(&self, query: &AdQuery) -> Result<Vec<Ad>, StorageError> {
        let query = query.clone().normalized();
        let sql = list_ads_sql(&query);

        let ads = sqlx::query_as::<_, Ad>(&sql)
            .bind(query.min_price)
            .bind(query.max_price)
            .bind(query.page_size)
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(ads)
    }

    async fn is_ad_owner(&self, ad_id: i64, user_id: i64) -> Result<bool, StorageError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM ads WHERE id = $1 AND user_id = $2)",
        )
        .bind(ad_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        manager::health_check(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{SortDirection, SortField};

    #[test]
    fn defaults_to_newest_first() {
        let sql = list_ads_sql(&AdQuery::default());
        assert!(sql.contains("ORDER BY a.created_at DESC, a.id DESC"));
        assert!(sql.contains("WHERE a.price BETWEEN $1 AND $2"));
        assert!(sql.contains("LIMIT $3 OFFSET $4"));
    }

    #[test]
    fn orders_by_requested_field() {
        let query = AdQuery {
            sort_by: SortField::Price,
            sort_order: SortDirection::Asc,
            ..AdQuery::default()
        };
        assert!(list_ads_sql(&query).contains("ORDER BY a.price ASC, a.id ASC"));
    }
}
