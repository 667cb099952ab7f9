use catalogtree::catalog::{CatalogError, SearchCategoriesQuery, SearchCategoryDto};
use catalogtree::store::CatalogStore;

use super::common::{category, empty_store, service, ROOT_CATEGORY_ID};

/// ```text
/// 1 Electronics
/// ├── 2 Phones
/// │   ├── 3 Phone cases      (article mapped)
/// │   └── 4 Phone chargers
/// └── 5 Laptops
///     └── 6 Laptop cases
/// 7 Home
/// ├── 8 Pillow cases
/// └── 9 Men's 100% cotton_wear
/// ```
fn electronics_store() -> CatalogStore {
    let store = empty_store();
    for record in [
        category(1, "Electronics", None, false),
        category(2, "Phones", Some(1), false),
        category(3, "Phone cases", Some(2), true),
        category(4, "Phone chargers", Some(2), true),
        category(5, "Laptops", Some(1), false),
        category(6, "Laptop cases", Some(5), true),
        category(7, "Home", None, false),
        category(8, "Pillow cases", Some(7), true),
        category(9, "Men's 100% cotton_wear", Some(7), true),
    ] {
        store.insert_category(&record).unwrap();
    }
    store.insert_article(1, "ART-1").unwrap();
    store.map_article_to_category(1, 3).unwrap();
    store
}

fn search(term: Option<&str>, number: Option<i64>) -> Result<Vec<SearchCategoryDto>, CatalogError> {
    service(electronics_store()).search_categories(&SearchCategoriesQuery {
        root_category_id: ROOT_CATEGORY_ID,
        article_number: "ART-1".to_string(),
        search_term: term.map(str::to_string),
        category_number: number,
    })
}

fn flatten(nodes: &[SearchCategoryDto]) -> Vec<i64> {
    nodes
        .iter()
        .flat_map(|n| std::iter::once(n.category_number).chain(flatten(&n.children)))
        .collect()
}

#[test]
fn test_shared_ancestor_appears_once() {
    let forest = search(Some("cases"), None).unwrap();

    // Electronics holds both phone and laptop cases; Home holds pillow cases
    assert_eq!(forest.len(), 2);
    let electronics = &forest[0];
    assert_eq!(electronics.label, "Electronics");
    let branches: Vec<i64> = electronics.children.iter().map(|c| c.category_number).collect();
    assert_eq!(branches, vec![20, 50]);
    assert_eq!(electronics.children[0].children[0].category_number, 30);
    assert_eq!(electronics.children[1].children[0].category_number, 60);

    let numbers = flatten(&forest);
    let mut unique = numbers.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(numbers.len(), unique.len());
    // chargers did not match and are not an ancestor of a match
    assert!(!numbers.contains(&40));
}

#[test]
fn test_selected_and_parent_numbers() {
    let forest = search(Some("phone cases"), None).unwrap();
    assert_eq!(flatten(&forest), vec![10, 20, 30]);

    let phones = &forest[0].children[0];
    let cases = &phones.children[0];
    assert!(cases.is_selected);
    assert!(cases.is_leaf);
    assert_eq!(cases.parent_category_number, Some(20));
    assert!(!phones.is_selected);
    assert_eq!(forest[0].parent_category_number, None);
}

#[test]
fn test_search_by_category_number() {
    let forest = search(None, Some(60)).unwrap();
    assert_eq!(flatten(&forest), vec![10, 50, 60]);
    assert!(!forest[0].children[0].children[0].is_selected);
}

#[test]
fn test_search_is_case_insensitive() {
    assert_eq!(flatten(&search(Some("PILLOW"), None).unwrap()), vec![70, 80]);
}

#[test]
fn test_no_match() {
    let err = search(Some("garden"), None).unwrap_err();
    assert!(matches!(err, CatalogError::NoResultsForCategorySearch { .. }));
}

#[test]
fn test_subtree() {
    let numbers: Vec<i64> = service(electronics_store())
        .category_subtree(ROOT_CATEGORY_ID, 20)
        .unwrap()
        .iter()
        .map(|c| c.category_number)
        .collect();
    assert_eq!(numbers, vec![20, 30, 40]);
}

fn assert_no_results(term: &str) {
    match search(Some(term), None) {
        Err(CatalogError::NoResultsForCategorySearch { .. }) => {}
        other => panic!("expected no results for {term:?}, got {other:?}"),
    }
}

#[test]
fn test_like_wildcards_in_term_match_literally() {
    assert_eq!(flatten(&search(Some("%"), None).unwrap()), vec![70, 90]);
    assert_eq!(flatten(&search(Some("_"), None).unwrap()), vec![70, 90]);
    assert_eq!(flatten(&search(Some("100% COTTON_"), None).unwrap()), vec![70, 90]);
    // as a pattern this would match every "cases" category
    assert_no_results("c_ses");
    assert_no_results("phone%cases");
    assert_no_results(r"\");
}

#[test]
fn test_quote_in_term() {
    assert_eq!(flatten(&search(Some("men's"), None).unwrap()), vec![70, 90]);
    assert_no_results("o'neil");
}

#[test]
fn test_multi_line_term_is_searched_as_text() {
    assert_no_results("zz\nSELECT 1");
    assert_no_results("cases\r\nSELECT * FROM category --");
}
