//! SQLite schema of the product catalog store.
//!
//! Must stay in sync with `SchemaCatalog::product_catalog()`.

pub const CATALOG_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS root_category (
    id INTEGER PRIMARY KEY,
    locale_code TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS category (
    id INTEGER PRIMARY KEY,
    category_number INTEGER NOT NULL,
    name TEXT NOT NULL,
    path TEXT NOT NULL DEFAULT '',
    is_leaf INTEGER NOT NULL DEFAULT 0,
    root_category_id INTEGER NOT NULL REFERENCES root_category (id),
    parent_id INTEGER REFERENCES category (id),
    UNIQUE (root_category_id, category_number)
);

CREATE INDEX IF NOT EXISTS idx_category_parent ON category (parent_id);

CREATE TABLE IF NOT EXISTS article (
    id INTEGER PRIMARY KEY,
    article_number TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS article_category (
    article_id INTEGER NOT NULL REFERENCES article (id),
    category_id INTEGER NOT NULL REFERENCES category (id),
    PRIMARY KEY (article_id, category_id)
);

CREATE TABLE IF NOT EXISTS attribute (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    value_type TEXT NOT NULL,
    min_values INTEGER NOT NULL DEFAULT 0,
    max_values INTEGER NOT NULL DEFAULT 1,
    marketplace_attribute_ids TEXT NOT NULL DEFAULT '',
    root_category_id INTEGER NOT NULL REFERENCES root_category (id)
);

CREATE TABLE IF NOT EXISTS attribute_sub_attribute (
    parent_attribute_id INTEGER NOT NULL REFERENCES attribute (id),
    sub_attribute_id INTEGER NOT NULL REFERENCES attribute (id),
    PRIMARY KEY (parent_attribute_id, sub_attribute_id)
);

CREATE INDEX IF NOT EXISTS idx_sub_attribute_parent ON attribute_sub_attribute (parent_attribute_id);
"#;
