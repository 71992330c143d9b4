use crate::config::AppConfig;
use crate::database::{manager, schema};

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    let pool = manager::connect(&config.database).await?;
    schema::ensure_schema(&pool).await?;
    pool.close().await;

    println!("✓ Schema applied to {}", config.database.name);
    Ok(())
}
