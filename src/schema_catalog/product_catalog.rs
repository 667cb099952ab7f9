//! Built-in metadata for the product catalog store.
//!
//! Must stay in sync with `store::schema::CATALOG_DDL`.

use super::catalog::SchemaCatalog;
use super::entity::{EntityMetadata, ForeignKeyMetadata, NavigationMetadata};
use super::errors::SchemaCatalogError;

pub const ROOT_CATEGORY: &str = "root_category";
pub const CATEGORY: &str = "category";
pub const ARTICLE: &str = "article";
pub const ARTICLE_CATEGORY: &str = "article_category";
pub const ATTRIBUTE: &str = "attribute";
pub const ATTRIBUTE_SUB_ATTRIBUTE: &str = "attribute_sub_attribute";

/// Category navigation towards the root (ancestors)
pub const NAV_PARENT: &str = "parent";
/// Category navigation towards the leaves (descendants)
pub const NAV_CHILDREN: &str = "children";
/// Attribute navigation through the sub-attribute join table (descendants)
pub const NAV_SUB_ATTRIBUTES: &str = "sub_attributes";
/// Attribute navigation through the sub-attribute join table (ancestors)
pub const NAV_PARENT_ATTRIBUTES: &str = "parent_attributes";

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn fk(name: &str, columns: &[&str], principal: &str, principal_columns: &[&str]) -> ForeignKeyMetadata {
    ForeignKeyMetadata {
        name: name.to_string(),
        columns: names(columns),
        principal_entity: principal.to_string(),
        principal_columns: names(principal_columns),
    }
}

fn nav(name: &str, foreign_key: &str, points_to_principal: bool) -> NavigationMetadata {
    NavigationMetadata {
        name: name.to_string(),
        foreign_key: foreign_key.to_string(),
        points_to_principal,
    }
}

impl SchemaCatalog {
    /// Metadata for the product catalog tables created by the store.
    pub fn product_catalog() -> Result<Self, SchemaCatalogError> {
        let root_category = EntityMetadata {
            name: ROOT_CATEGORY.to_string(),
            table: ROOT_CATEGORY.to_string(),
            columns: names(&["id", "locale_code"]),
            primary_key: names(&["id"]),
            foreign_keys: vec![],
            navigations: vec![],
        };

        let category = EntityMetadata {
            name: CATEGORY.to_string(),
            table: CATEGORY.to_string(),
            columns: names(&[
                "id",
                "category_number",
                "name",
                "path",
                "is_leaf",
                "root_category_id",
                "parent_id",
            ]),
            primary_key: names(&["id"]),
            foreign_keys: vec![
                fk("fk_category_parent", &["parent_id"], CATEGORY, &["id"]),
                fk("fk_category_root_category", &["root_category_id"], ROOT_CATEGORY, &["id"]),
            ],
            navigations: vec![
                nav(NAV_PARENT, "fk_category_parent", true),
                nav(NAV_CHILDREN, "fk_category_parent", false),
                nav("root_category", "fk_category_root_category", true),
                nav("articles", "fk_article_category_category", false),
            ],
        };

        let article = EntityMetadata {
            name: ARTICLE.to_string(),
            table: ARTICLE.to_string(),
            columns: names(&["id", "article_number"]),
            primary_key: names(&["id"]),
            foreign_keys: vec![],
            navigations: vec![],
        };

        let article_category = EntityMetadata {
            name: ARTICLE_CATEGORY.to_string(),
            table: ARTICLE_CATEGORY.to_string(),
            columns: names(&["article_id", "category_id"]),
            primary_key: names(&["article_id", "category_id"]),
            foreign_keys: vec![
                fk("fk_article_category_article", &["article_id"], ARTICLE, &["id"]),
                fk("fk_article_category_category", &["category_id"], CATEGORY, &["id"]),
            ],
            navigations: vec![],
        };

        let attribute = EntityMetadata {
            name: ATTRIBUTE.to_string(),
            table: ATTRIBUTE.to_string(),
            columns: names(&[
                "id",
                "name",
                "value_type",
                "min_values",
                "max_values",
                "marketplace_attribute_ids",
                "root_category_id",
            ]),
            primary_key: names(&["id"]),
            foreign_keys: vec![fk(
                "fk_attribute_root_category",
                &["root_category_id"],
                ROOT_CATEGORY,
                &["id"],
            )],
            navigations: vec![
                nav(NAV_SUB_ATTRIBUTES, "fk_sub_attribute_parent", false),
                nav(NAV_PARENT_ATTRIBUTES, "fk_sub_attribute_child", false),
            ],
        };

        let attribute_sub_attribute = EntityMetadata {
            name: ATTRIBUTE_SUB_ATTRIBUTE.to_string(),
            table: ATTRIBUTE_SUB_ATTRIBUTE.to_string(),
            columns: names(&["parent_attribute_id", "sub_attribute_id"]),
            primary_key: names(&["parent_attribute_id", "sub_attribute_id"]),
            foreign_keys: vec![
                fk("fk_sub_attribute_parent", &["parent_attribute_id"], ATTRIBUTE, &["id"]),
                fk("fk_sub_attribute_child", &["sub_attribute_id"], ATTRIBUTE, &["id"]),
            ],
            navigations: vec![],
        };

        SchemaCatalog::new(vec![
            root_category,
            category,
            article,
            article_category,
            attribute,
            attribute_sub_attribute,
        ])
    }
}
