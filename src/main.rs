// src/main.rs
// catalogd: opens the catalog store, reconciles every counter and reports
// what it found.

use std::sync::Arc;

use anyhow::Context;
use log::info;

use catalog::config::CatalogConfig;
use catalog::db::{
    create_connection_pool, get_database_stats, initialize_database, verify_database_integrity,
};
use catalog::events::EventBus;
use catalog::logging::init_logger;
use catalog::services::{CatalogRepositories, CatalogService, RecomputeMode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. ENVIRONMENT
    dotenvy::dotenv().ok();
    init_logger();
    let config = CatalogConfig::from_env().context("reading configuration")?;

    // 2. STORE
    let pool = Arc::new(create_connection_pool(&config).context("opening database")?);
    {
        let conn = pool.get()?;
        initialize_database(&conn)?;
        verify_database_integrity(&conn)?;
    }

    // 3. SERVICE
    let mode = if config.background_recompute {
        RecomputeMode::Background
    } else {
        RecomputeMode::Inline
    };
    let service = CatalogService::new(
        CatalogRepositories::sqlite(Arc::clone(&pool)),
        Arc::new(EventBus::new()),
        mode,
    );

    // 4. RECONCILE
    let summary = tokio::task::block_in_place(|| service.recompute_all())?;
    service.settled().await;

    let stats = get_database_stats(&*pool.get()?)?;
    for (collection, count) in &stats.documents {
        info!("{}: {} documents", collection, count);
    }
    info!(
        "Catalog ready at {} ({} bytes, {} counter failures)",
        config.database_path.display(),
        stats.size_bytes,
        summary.failed
    );

    Ok(())
}
