//! Class roster and daily attendance service over SQLite.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod model;
pub mod schema;
pub mod store;
pub mod telemetry;

use std::sync::Arc;

use anyhow::Context;

use crate::config::AppConfig;
use crate::http::ApiServer;
use crate::store::Store;

/// Reads configuration, opens the database and serves until shutdown.
pub async fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::from_env().map_err(error::AppError::from)?;
    telemetry::init_logging(config.log_format, &config.log_level)?;

    let db_path = db::db_path(&config.data_dir);
    let store = Store::open(&config.data_dir)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;
    tracing::info!(path = %db_path.display(), "database ready");

    ApiServer::new(Arc::new(store)).serve(config.bind).await?;
    Ok(())
}
