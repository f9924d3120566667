//! Shared catalog snapshot
//!
//! Readers take an `Arc<Catalog>` and run against it without holding the
//! lock; writers swap the whole `Arc`.

use std::sync::Arc;
use tokio::sync::RwLock;

use super::types::Catalog;

#[derive(Debug, Clone)]
pub struct CatalogCache {
    current: Arc<RwLock<Option<Arc<Catalog>>>>,
    empty: Arc<Catalog>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogCache {
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            empty: Arc::new(Catalog::empty()),
        }
    }

    /// Publish the first catalog
    ///
    /// Does nothing when a catalog is already published, so a slow initial
    /// load never replaces a newer refresh. Returns whether it was stored.
    pub async fn init(&self, catalog: Catalog) -> bool {
        let mut current = self.current.write().await;
        if current.is_some() {
            tracing::debug!("Catalog already initialized, keeping the published snapshot");
            return false;
        }
        tracing::info!(
            "Catalog initialized: {} operators, {} devices",
            catalog.operators.len(),
            catalog.devices.len()
        );
        *current = Some(Arc::new(catalog));
        true
    }

    /// Replace the published catalog, returning the previous one
    pub async fn refresh(&self, catalog: Catalog) -> Option<Arc<Catalog>> {
        tracing::info!(
            "Catalog refreshed: {} operators, {} devices",
            catalog.operators.len(),
            catalog.devices.len()
        );
        self.current.write().await.replace(Arc::new(catalog))
    }

    pub async fn clear(&self) {
        *self.current.write().await = None;
    }

    pub async fn is_initialized(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Current catalog; an empty one until `init` or `refresh`
    pub async fn snapshot(&self) -> Arc<Catalog> {
        match self.current.read().await.as_ref() {
            Some(catalog) => catalog.clone(),
            None => self.empty.clone(),
        }
    }
}
