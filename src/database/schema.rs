use sqlx::PgPool;
use tracing::info;

/// Idempotent DDL for the two tables the service owns. Applied in order.
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        login VARCHAR(50) NOT NULL UNIQUE,
        password VARCHAR(255) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS ads (
        id BIGSERIAL PRIMARY KEY,
        title VARCHAR(100) NOT NULL,
        description VARCHAR(1000) NOT NULL,
        image_url VARCHAR(255) NOT NULL,
        price NUMERIC(10, 2) NOT NULL CHECK (price >= 0 AND price <= 1000000),
        user_id BIGINT NOT NULL REFERENCES users (id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    "CREATE INDEX IF NOT EXISTS ads_price_idx ON ads (price)",
    "CREATE INDEX IF NOT EXISTS ads_created_at_idx ON ads (created_at)",
    "CREATE INDEX IF NOT EXISTS ads_user_id_idx ON ads (user_id)",
];

pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema is up to date ({} statements)", SCHEMA.len());
    Ok(())
}
