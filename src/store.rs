use crate::db::{self, DbPool};
use crate::error::StoreError;
use crate::models::filter::FilterOptions;
use crate::models::image::{Category, PortfolioImage};

/// Read side of the catalog as seen by the portfolio service.
///
/// Calls are synchronous; the service moves them onto the blocking pool.
pub trait PortfolioStore: Send + Sync + 'static {
    fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
    fn list_category_images(&self, category_id: &str) -> Result<Vec<PortfolioImage>, StoreError>;
    fn get_image(&self, category_id: &str, image_id: &str) -> Result<Option<PortfolioImage>, StoreError>;
    fn query_images(&self, options: &FilterOptions) -> Result<Vec<PortfolioImage>, StoreError>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl PortfolioStore for SqliteStore {
    fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let conn = self.pool.get()?;
        Ok(db::query::list_categories(&conn)?)
    }

    fn list_category_images(&self, category_id: &str) -> Result<Vec<PortfolioImage>, StoreError> {
        let conn = self.pool.get()?;
        Ok(db::query::list_category_images(&conn, category_id)?)
    }

    fn get_image(&self, category_id: &str, image_id: &str) -> Result<Option<PortfolioImage>, StoreError> {
        let conn = self.pool.get()?;
        Ok(db::query::get_image(&conn, category_id, image_id)?)
    }

    fn query_images(&self, options: &FilterOptions) -> Result<Vec<PortfolioImage>, StoreError> {
        let conn = self.pool.get()?;
        Ok(db::query::query_images(&conn, options)?)
    }
}
