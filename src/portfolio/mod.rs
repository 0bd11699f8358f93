//! Read-only portfolio operations consumed by the gallery pages: facet
//! discovery, filtered queries, related images and before/after pairs.
//!
//! Every public operation fails soft. Store errors are logged and turned
//! into the empty value of the operation's return type so callers only ever
//! render an empty state.

pub mod facets;
pub mod related;

use std::sync::Arc;
use futures_util::future::join_all;
use tracing::{error, warn};
use crate::error::StoreError;
use crate::models::filter::{FilterOptions, DEFAULT_PAGE_SIZE};
use crate::models::image::{Category, PortfolioImage};
use crate::store::PortfolioStore;

pub struct PortfolioService<S> {
    store: Arc<S>,
    page_size: usize,
}

impl<S> Clone for PortfolioService<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), page_size: self.page_size }
    }
}

impl<S: PortfolioStore> PortfolioService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store, page_size: DEFAULT_PAGE_SIZE }
    }

    /// Page size used when a query does not set `limit`.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    async fn run<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&S) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(store.as_ref())).await?
    }

    /// Read every category and every image under it.
    ///
    /// Per-category fetches run concurrently. A category whose images fail to
    /// load is skipped; only a failure to list categories is an error.
    pub(crate) async fn scan_catalog(&self) -> Result<(Vec<Category>, Vec<PortfolioImage>), StoreError> {
        let categories = self.run(|store| store.list_categories()).await?;

        let fetches = categories.iter().map(|category| {
            let category_id = category.id.clone();
            async move {
                let lookup = category_id.clone();
                let result = self.run(move |store| store.list_category_images(&lookup)).await;
                (category_id, result)
            }
        });

        let mut images = Vec::new();
        for (category_id, result) in join_all(fetches).await {
            match result {
                Ok(batch) => images.extend(batch.into_iter().map(|mut img| {
                    img.category_id = category_id.clone();
                    img
                })),
                Err(e) => warn!(category = %category_id, error = %e, "skipping category during catalog scan"),
            }
        }
        Ok((categories, images))
    }

    /// Run one composite query over images of every category.
    ///
    /// Image paths are returned untransformed. Any failure yields an empty
    /// list.
    pub async fn get_filtered_portfolio_images(&self, mut options: FilterOptions) -> Vec<PortfolioImage> {
        if options.limit.is_none() {
            options.limit = Some(self.page_size);
        }
        if options.has_empty_selection() {
            return Vec::new();
        }
        match self.run(move |store| store.query_images(&options)).await {
            Ok(images) => images,
            Err(e) => {
                error!(error = %e, "filtered portfolio query failed");
                Vec::new()
            }
        }
    }
}
