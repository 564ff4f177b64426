use std::sync::Arc;

use chrono::{DateTime, Utc};
use giftchoice_core::Product;
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::Result;
use crate::source::ProductSource;

#[derive(Debug, Default)]
struct Snapshot {
    products: Arc<Vec<Product>>,
    fetched_at: Option<DateTime<Utc>>,
}

/// Shared, read-mostly product catalog.
///
/// Starts empty. A failed fetch keeps whatever was loaded before, so until
/// the first successful fetch the catalog simply reads as empty.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    inner: Arc<RwLock<Snapshot>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        let store = Self::new();
        store.replace(products);
        store
    }

    /// Current product list; cheap to call per request
    pub fn snapshot(&self) -> Arc<Vec<Product>> {
        self.inner.read().products.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// When the current snapshot was loaded, if ever
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().fetched_at
    }

    pub fn replace(&self, products: Vec<Product>) {
        let mut inner = self.inner.write();
        inner.products = Arc::new(products);
        inner.fetched_at = Some(Utc::now());
    }

    /// Fetch from `source` and swap the snapshot in. On failure the previous
    /// snapshot stays in place and the error is returned after being logged.
    pub async fn refresh(&self, source: &dyn ProductSource) -> Result<usize> {
        match source.fetch_products().await {
            Ok(products) => {
                let count = products.len();
                self.replace(products);
                info!("Loaded {} products from {} source", count, source.name());
                Ok(count)
            }
            Err(e) => {
                warn!("Failed to fetch products from {} source: {}", source.name(), e);
                Err(e)
            }
        }
    }

    /// Fetch once in the background without blocking startup
    pub fn spawn_initial_fetch(&self, source: Arc<dyn ProductSource>) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            // already logged inside refresh
            let _ = store.refresh(source.as_ref()).await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::source::StaticProductSource;
    use async_trait::async_trait;

    struct FailingSource;

    #[async_trait]
    impl ProductSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch_products(&self) -> Result<Vec<Product>> {
            Err(CatalogError::Network("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_starts_empty() {
        let store = CatalogStore::new();
        assert!(store.is_empty());
        assert!(store.fetched_at().is_none());
    }

    #[tokio::test]
    async fn test_refresh_replaces_snapshot() {
        let store = CatalogStore::new();
        let source = StaticProductSource::new(vec![
            Product::new("1", "Mug", ""),
            Product::new("2", "Frame", ""),
        ]);

        let before = store.snapshot();
        assert_eq!(store.refresh(&source).await.unwrap(), 2);

        assert_eq!(store.len(), 2);
        assert!(store.fetched_at().is_some());
        // readers holding the old snapshot are unaffected
        assert!(before.is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let store = CatalogStore::with_products(vec![Product::new("1", "Mug", "")]);

        assert!(store.refresh(&FailingSource).await.is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot()[0].name, "Mug");
    }

    #[tokio::test]
    async fn test_failed_initial_fetch_leaves_catalog_empty() {
        let store = CatalogStore::new();
        store
            .spawn_initial_fetch(Arc::new(FailingSource))
            .await
            .unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_initial_fetch_in_background() {
        let store = CatalogStore::new();
        let source = Arc::new(StaticProductSource::new(vec![Product::new("7", "Lamp", "")]));

        store.spawn_initial_fetch(source).await.unwrap();
        assert_eq!(store.snapshot()[0].id, "7");
    }
}
