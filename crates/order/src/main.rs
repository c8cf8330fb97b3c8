use anyhow::{Context, Result};
use order::{config::myconfig::Config, handler::AppRouter, state::AppState};
use shared::{
    config::{ConnectionManager, ConnectionPool},
    utils::{Telemetry, init_logger},
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = Config::init().context("Failed to load configuration")?;

    let mut telemetry = Telemetry::new("order-service", config.otel_endpoint.clone());
    let logger_provider = telemetry
        .init_logger()
        .context("Failed to initialize log exporter")?;
    telemetry
        .init_meter()
        .context("Failed to initialize metric exporter")?;
    telemetry
        .init_tracer()
        .context("Failed to initialize span exporter")?;

    let _log_guard = init_logger(
        logger_provider,
        "order-service",
        config.is_dev,
        config.enable_file_log,
    );

    let pool = match config.database_url.as_deref() {
        Some(url) => Some(setup_database(url, &config).await?),
        None => None,
    };

    let state = AppState::new(pool, &config).context("Failed to create AppState")?;

    info!("✅ Application setup completed successfully.");

    let served = AppRouter::serve(config.port, state).await;

    if let Err(e) = telemetry.shutdown().await {
        error!("Failed to shutdown telemetry: {}", e);
    }

    info!("✅ Order service shutdown complete.");

    served
}

async fn setup_database(url: &str, config: &Config) -> Result<ConnectionPool> {
    let pool = ConnectionManager::new_pool(url, config.db_min_conn, config.db_max_conn)
        .await
        .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&pool)
            .await
            .context("failed to migration database")?;
        info!("✅ Database migrations applied.");
    }

    Ok(pool)
}

pub async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    Ok(())
}
