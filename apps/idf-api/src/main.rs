//! IDF API 服务入口。

use idf_api::{AppState, build_app};
use idf_auth::LoggingResetNotifier;
use idf_config::AppConfig;
use idf_storage::{PgContactStore, PgUserStore, connect_pool};
use idf_telemetry::init_tracing;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing();

    let state = match config.database_url.as_deref() {
        Some(database_url) => {
            // Postgres 存储（需先执行 migrations）
            let pool = connect_pool(database_url).await?;
            AppState::new(
                &config,
                Arc::new(PgUserStore::new(pool.clone())),
                Arc::new(PgContactStore::new(pool)),
                Arc::new(LoggingResetNotifier),
            )
        }
        None => {
            tracing::warn!("IDF_DATABASE_URL not set, using in-memory stores");
            AppState::in_memory(&config)
        }
    };
    if config.admin_email.is_some() {
        tracing::info!("admin email override enabled");
    }

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!(addr = %config.http_addr, "idf-api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
