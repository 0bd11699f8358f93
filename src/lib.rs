pub mod utils;
pub mod models;
pub mod error;
pub mod db;
pub mod store;
pub mod portfolio;
pub mod cdn;
pub mod api;

use std::sync::Arc;
use parking_lot::RwLock;
use cdn::{CdnConfig, UrlTransformer};
use db::DbPool;
use portfolio::PortfolioService;
use store::SqliteStore;
use utils::config::Config;

pub struct AppState {
    pub started_at: std::time::Instant,
    pub config: Config,
    pub pool: DbPool,
    pub portfolio: PortfolioService<SqliteStore>,
    transformer: RwLock<Arc<UrlTransformer>>,
}

impl AppState {
    pub fn new(config: Config, pool: DbPool) -> Self {
        let store = Arc::new(SqliteStore::new(pool.clone()));
        let portfolio = PortfolioService::new(store).with_page_size(config.page_size);
        let transformer = RwLock::new(Arc::new(UrlTransformer::new(config.cdn())));
        Self {
            started_at: std::time::Instant::now(),
            config,
            pool,
            portfolio,
            transformer,
        }
    }

    /// Snapshot of the transformer currently in effect.
    pub fn transformer(&self) -> Arc<UrlTransformer> {
        Arc::clone(&self.transformer.read())
    }

    /// Replace the CDN settings for every subsequent URL.
    pub fn update_cdn_config(&self, config: CdnConfig) {
        tracing::info!(cloud = %config.cloud_name, folder = ?config.folder, "cdn configuration updated");
        *self.transformer.write() = Arc::new(UrlTransformer::new(config));
    }
}
