use std::sync::Arc;
use tracing::info;

use crate::app::{router, AppState};
use crate::config::AppConfig;
use crate::database::{manager, schema, PgStorage};

/// Connect, bootstrap the schema and serve until Ctrl+C or SIGTERM.
pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting classifieds-api v{}", env!("CARGO_PKG_VERSION"));

    let pool = manager::connect(&config.database).await?;
    schema::ensure_schema(&pool).await?;

    let state = AppState::new(&config, Arc::new(PgStorage::new(pool)));
    let app = router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
