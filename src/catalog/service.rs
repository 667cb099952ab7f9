use std::sync::Arc;

use crate::recursive_query::RecursiveQueryEngine;
use crate::store::CatalogStore;

/// Catalog use cases over the recursive query engine and the store.
///
/// All methods block on the database; async callers use `spawn_blocking`.
#[derive(Clone)]
pub struct CatalogService {
    pub(super) engine: Arc<RecursiveQueryEngine>,
    pub(super) store: Arc<CatalogStore>,
}

impl CatalogService {
    pub fn new(engine: Arc<RecursiveQueryEngine>, store: Arc<CatalogStore>) -> Self {
        CatalogService { engine, store }
    }

    pub fn engine(&self) -> &RecursiveQueryEngine {
        &self.engine
    }
}

#[cfg(test)]
pub(crate) fn demo_service() -> CatalogService {
    use crate::recursive_query::QueryCacheConfig;
    use crate::schema_catalog::SchemaCatalog;

    let store = CatalogStore::open_in_memory().unwrap();
    store.initialize_schema().unwrap();
    store.seed_demo_catalog().unwrap();
    let engine = RecursiveQueryEngine::new(
        Arc::new(SchemaCatalog::product_catalog().unwrap()),
        QueryCacheConfig::default(),
    );
    CatalogService::new(Arc::new(engine), Arc::new(store))
}
