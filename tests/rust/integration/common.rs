use std::sync::Arc;

use catalogtree::{
    catalog::CatalogService,
    recursive_query::{QueryCacheConfig, RecursiveQueryEngine},
    schema_catalog::SchemaCatalog,
    store::{AttributeRecord, CatalogStore, CategoryRecord},
};

pub const ROOT_CATEGORY_ID: i64 = 1;

pub fn empty_store() -> CatalogStore {
    let store = CatalogStore::open_in_memory().unwrap();
    store.initialize_schema().unwrap();
    store.insert_root_category(ROOT_CATEGORY_ID, "de_DE").unwrap();
    store
}

pub fn demo_store() -> CatalogStore {
    let store = CatalogStore::open_in_memory().unwrap();
    store.initialize_schema().unwrap();
    store.seed_demo_catalog().unwrap();
    store
}

pub fn engine() -> RecursiveQueryEngine {
    RecursiveQueryEngine::new(
        Arc::new(SchemaCatalog::product_catalog().unwrap()),
        QueryCacheConfig::default(),
    )
}

pub fn service(store: CatalogStore) -> CatalogService {
    CatalogService::new(Arc::new(engine()), Arc::new(store))
}

/// Category `id` with number `id * 10`
pub fn category(id: i64, name: &str, parent_id: Option<i64>, is_leaf: bool) -> CategoryRecord {
    CategoryRecord {
        id,
        category_number: id * 10,
        name: name.to_string(),
        path: name.to_string(),
        is_leaf,
        root_category_id: ROOT_CATEGORY_ID,
        parent_id,
    }
}

pub fn attribute(id: i64, name: &str) -> AttributeRecord {
    AttributeRecord {
        id,
        name: name.to_string(),
        value_type: "String".to_string(),
        min_values: 0,
        max_values: 1,
        marketplace_attribute_ids: String::new(),
        root_category_id: ROOT_CATEGORY_ID,
    }
}

/// A chain `1 -> 2 -> ... -> depth` plus a side branch hanging off node 1
/// (`depth + 1`), so queries along the chain must not pick up the branch.
pub fn chain_store(depth: i64) -> CatalogStore {
    let store = empty_store();
    for id in 1..=depth {
        let parent = if id == 1 { None } else { Some(id - 1) };
        store
            .insert_category(&category(id, &format!("Level {}", id), parent, id == depth))
            .unwrap();
    }
    store
        .insert_category(&category(depth + 1, "Side branch", Some(1), true))
        .unwrap();
    store
}
