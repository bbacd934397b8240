// src/config.rs
//
// Runtime configuration for the catalog store and recompute worker.

use std::path::PathBuf;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Max pooled connections
    pub pool_size: u32,
    /// SQLite busy timeout
    pub busy_timeout_ms: u64,
    /// Run document-level recomputations on a background worker
    pub background_recompute: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("catalog").join("catalog.db"),
            pool_size: 15,
            busy_timeout_ms: 5000,
            background_recompute: true,
        }
    }
}

impl CatalogConfig {
    /// Defaults overridden by `CATALOG_*` environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("CATALOG_DB_PATH") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(size) = parse_var::<u32>("CATALOG_POOL_SIZE")? {
            config.pool_size = size;
        }
        if let Some(timeout) = parse_var::<u64>("CATALOG_BUSY_TIMEOUT_MS")? {
            config.busy_timeout_ms = timeout;
        }
        if let Some(background) = parse_var::<bool>("CATALOG_BACKGROUND_RECOMPUTE")? {
            config.background_recompute = background;
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> AppResult<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Other(format!("Invalid value '{}' for {}", raw, name))),
        Err(_) => Ok(None),
    }
}
