use catalogtree::{
    recursive_query::{placeholder_indices, PlaceholderStyle},
    schema_catalog::product_catalog::{ATTRIBUTE, CATEGORY, NAV_PARENT, NAV_SUB_ATTRIBUTES},
    seed_query::Filter,
};
use serde_json::json;

use super::common::{attribute, chain_store, engine};

#[test]
fn test_every_parameter_gets_one_placeholder() {
    // twelve values so that p1 and p10..p11 must not be confused
    let ids: Vec<i64> = (1..=12).collect();
    let filter = Filter::and(vec![
        Filter::eq("root_category_id", 1),
        Filter::is_in("id", ids.clone()),
    ]);
    let compiled = engine()
        .compile_recursive_query(CATEGORY, &filter, NAV_PARENT)
        .unwrap();

    assert_eq!(compiled.parameters.len(), 13);
    assert_eq!(placeholder_indices(&compiled.sql_text), (0..13).collect::<Vec<_>>());
    assert_eq!(compiled.parameters[0], json!(1));
    assert_eq!(compiled.parameters[12], json!(12));

    let store = chain_store(12);
    assert_eq!(store.query_categories(&compiled).unwrap().len(), 12);
}

#[test]
fn test_native_placeholders() {
    let compiled = engine()
        .compile_recursive_query(
            CATEGORY,
            &Filter::and(vec![
                Filter::eq("root_category_id", 1),
                Filter::contains_ignore_case("name", "level"),
            ]),
            NAV_PARENT,
        )
        .unwrap();

    let sqlite = compiled.to_native(PlaceholderStyle::QuestionNumbered).unwrap();
    let postgres = compiled.to_native(PlaceholderStyle::DollarNumbered).unwrap();
    assert!(sqlite.contains("?1") && sqlite.contains("?2"));
    assert!(postgres.contains("$1") && postgres.contains("$2"));
    assert!(!sqlite.contains("{0}"));
}

#[test]
fn test_string_parameters_are_bound_not_inlined() {
    let store = chain_store(3);
    store
        .insert_attribute(&attribute(1, "Robert'); DROP TABLE category; --"))
        .unwrap();

    let compiled = engine()
        .compile_recursive_query(
            ATTRIBUTE,
            &Filter::eq("name", "Robert'); DROP TABLE category; --"),
            NAV_SUB_ATTRIBUTES,
        )
        .unwrap();
    assert!(!compiled.sql_text.contains("DROP TABLE"));

    let attributes = store.query_attributes(&compiled).unwrap();
    assert_eq!(attributes.len(), 1);

    let categories = engine()
        .compile_recursive_query(CATEGORY, &Filter::eq("id", 3), NAV_PARENT)
        .unwrap();
    assert_eq!(store.query_categories(&categories).unwrap().len(), 3);
}
