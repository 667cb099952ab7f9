use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// A row of the `category` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub category_number: i64,
    pub name: String,
    pub path: String,
    pub is_leaf: bool,
    pub root_category_id: i64,
    pub parent_id: Option<i64>,
}

impl CategoryRecord {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(CategoryRecord {
            id: row.get("id")?,
            category_number: row.get("category_number")?,
            name: row.get("name")?,
            path: row.get("path")?,
            is_leaf: row.get("is_leaf")?,
            root_category_id: row.get("root_category_id")?,
            parent_id: row.get("parent_id")?,
        })
    }
}

/// A row of the `attribute` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub id: i64,
    pub name: String,
    pub value_type: String,
    pub min_values: i64,
    pub max_values: i64,
    /// Comma separated marketplace attribute ids
    pub marketplace_attribute_ids: String,
    pub root_category_id: i64,
}

impl AttributeRecord {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(AttributeRecord {
            id: row.get("id")?,
            name: row.get("name")?,
            value_type: row.get("value_type")?,
            min_values: row.get("min_values")?,
            max_values: row.get("max_values")?,
            marketplace_attribute_ids: row.get("marketplace_attribute_ids")?,
            root_category_id: row.get("root_category_id")?,
        })
    }
}
