//! Many-to-many closures over the `attribute_sub_attribute` join table.

use catalogtree::{
    schema_catalog::product_catalog::{ATTRIBUTE, NAV_PARENT_ATTRIBUTES, NAV_SUB_ATTRIBUTES},
    seed_query::Filter,
    store::CatalogStore,
};

use super::common::{attribute, empty_store, engine};

/// ```text
/// 1 -> 2, 1 -> 3, 3 -> 4         (tree)
/// 5                              (no links)
/// 6 -> 7, 6 -> 8, 7 -> 9, 8 -> 9 (diamond)
/// 10 -> 11, 11 -> 10             (cycle)
/// ```
fn attribute_store() -> CatalogStore {
    let store = empty_store();
    for id in 1..=11 {
        store.insert_attribute(&attribute(id, &format!("Attribute {}", id))).unwrap();
    }
    for (parent, child) in [(1, 2), (1, 3), (3, 4), (6, 7), (6, 8), (7, 9), (8, 9), (10, 11), (11, 10)] {
        store.link_sub_attribute(parent, child).unwrap();
    }
    store
}

fn closure(store: &CatalogStore, ids: &[i64], navigation: &str) -> Vec<i64> {
    let compiled = engine()
        .compile_recursive_query(ATTRIBUTE, &Filter::is_in("id", ids.iter().copied()), navigation)
        .unwrap();
    let mut ids: Vec<i64> = store
        .query_attributes(&compiled)
        .unwrap()
        .into_iter()
        .map(|a| a.id)
        .collect();
    ids.sort_unstable();
    ids
}

#[test]
fn test_sub_attributes_follow_join_rows_only() {
    let store = attribute_store();
    assert_eq!(closure(&store, &[1], NAV_SUB_ATTRIBUTES), vec![1, 2, 3, 4]);
    assert_eq!(closure(&store, &[3], NAV_SUB_ATTRIBUTES), vec![3, 4]);
}

#[test]
fn test_attribute_without_links_yields_itself() {
    let store = attribute_store();
    assert_eq!(closure(&store, &[5], NAV_SUB_ATTRIBUTES), vec![5]);
    assert_eq!(closure(&store, &[5], NAV_PARENT_ATTRIBUTES), vec![5]);
}

#[test]
fn test_diamond_is_visited_once() {
    let store = attribute_store();
    assert_eq!(closure(&store, &[6], NAV_SUB_ATTRIBUTES), vec![6, 7, 8, 9]);
}

#[test]
fn test_parent_attributes_walk_the_join_table_backwards() {
    let store = attribute_store();
    assert_eq!(closure(&store, &[9], NAV_PARENT_ATTRIBUTES), vec![6, 7, 8, 9]);
    assert_eq!(closure(&store, &[4], NAV_PARENT_ATTRIBUTES), vec![1, 3, 4]);
}

#[test]
fn test_cyclic_links_terminate() {
    let store = attribute_store();
    assert_eq!(closure(&store, &[10], NAV_SUB_ATTRIBUTES), vec![10, 11]);
}

#[test]
fn test_attribute_hierarchy_use_case() {
    let service = super::common::service(attribute_store());
    let attributes = service.attribute_hierarchy(&[3, 6]).unwrap();
    let ids: Vec<i64> = attributes.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![3, 4, 6, 7, 8, 9]);
}
