//! Direct self-reference closures over the `category.parent_id` column.

use catalogtree::{
    schema_catalog::product_catalog::{CATEGORY, NAV_CHILDREN, NAV_PARENT},
    seed_query::Filter,
};

use super::common::{chain_store, engine};

#[test]
fn test_ancestors_of_deep_leaf_are_the_full_path() {
    let depth = 40;
    let store = chain_store(depth);
    let compiled = engine()
        .compile_recursive_query(CATEGORY, &Filter::eq("id", depth), NAV_PARENT)
        .unwrap();

    let mut ids: Vec<i64> = store
        .query_categories(&compiled)
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    ids.sort_unstable();

    // exactly leaf..root, each once, without the side branch
    assert_eq!(ids, (1..=depth).collect::<Vec<_>>());
}

#[test]
fn test_ancestors_of_root_is_the_root() {
    let store = chain_store(5);
    let compiled = engine()
        .compile_recursive_query(CATEGORY, &Filter::eq("id", 1), NAV_PARENT)
        .unwrap();

    let categories = store.query_categories(&compiled).unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].parent_id, None);
}

#[test]
fn test_descendants_include_every_branch() {
    let store = chain_store(6);
    let compiled = engine()
        .compile_recursive_query(CATEGORY, &Filter::eq("id", 1), NAV_CHILDREN)
        .unwrap();

    let mut ids: Vec<i64> = store
        .query_categories(&compiled)
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn test_descendants_of_middle_node() {
    let store = chain_store(6);
    let compiled = engine()
        .compile_recursive_query(CATEGORY, &Filter::eq("category_number", 40), NAV_CHILDREN)
        .unwrap();

    let mut ids: Vec<i64> = store
        .query_categories(&compiled)
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![4, 5, 6]);
}

#[test]
fn test_overlapping_seeds_return_each_row_once() {
    let store = chain_store(8);
    let compiled = engine()
        .compile_recursive_query(CATEGORY, &Filter::is_in("id", [8, 5, 9]), NAV_PARENT)
        .unwrap();

    let mut ids: Vec<i64> = store
        .query_categories(&compiled)
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
}

#[test]
fn test_empty_seed_returns_no_rows() {
    let store = chain_store(3);
    let compiled = engine()
        .compile_recursive_query(CATEGORY, &Filter::eq("id", 404), NAV_PARENT)
        .unwrap();
    assert!(store.query_categories(&compiled).unwrap().is_empty());
}
