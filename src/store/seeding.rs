//! Insert helpers for tests and the demo database.

use rusqlite::params;

use super::connection::CatalogStore;
use super::errors::StoreError;
use super::records::{AttributeRecord, CategoryRecord};

impl CatalogStore {
    pub fn insert_root_category(&self, id: i64, locale_code: &str) -> Result<(), StoreError> {
        self.connection()?.execute(
            "INSERT INTO root_category (id, locale_code) VALUES (?1, ?2)",
            params![id, locale_code],
        )?;
        Ok(())
    }

    pub fn insert_category(&self, category: &CategoryRecord) -> Result<(), StoreError> {
        self.connection()?.execute(
            "INSERT INTO category (id, category_number, name, path, is_leaf, root_category_id, parent_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                category.id,
                category.category_number,
                category.name,
                category.path,
                category.is_leaf,
                category.root_category_id,
                category.parent_id,
            ],
        )?;
        Ok(())
    }

    pub fn insert_article(&self, id: i64, article_number: &str) -> Result<(), StoreError> {
        self.connection()?.execute(
            "INSERT INTO article (id, article_number) VALUES (?1, ?2)",
            params![id, article_number],
        )?;
        Ok(())
    }

    pub fn map_article_to_category(&self, article_id: i64, category_id: i64) -> Result<(), StoreError> {
        self.connection()?.execute(
            "INSERT INTO article_category (article_id, category_id) VALUES (?1, ?2)",
            params![article_id, category_id],
        )?;
        Ok(())
    }

    pub fn insert_attribute(&self, attribute: &AttributeRecord) -> Result<(), StoreError> {
        self.connection()?.execute(
            "INSERT INTO attribute (id, name, value_type, min_values, max_values, marketplace_attribute_ids, root_category_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                attribute.id,
                attribute.name,
                attribute.value_type,
                attribute.min_values,
                attribute.max_values,
                attribute.marketplace_attribute_ids,
                attribute.root_category_id,
            ],
        )?;
        Ok(())
    }

    pub fn link_sub_attribute(&self, parent_attribute_id: i64, sub_attribute_id: i64) -> Result<(), StoreError> {
        self.connection()?.execute(
            "INSERT INTO attribute_sub_attribute (parent_attribute_id, sub_attribute_id) VALUES (?1, ?2)",
            params![parent_attribute_id, sub_attribute_id],
        )?;
        Ok(())
    }

    /// True when no root category exists yet
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        let count: i64 = self
            .connection()?
            .query_row("SELECT COUNT(*) FROM root_category", [], |row| row.get(0))?;
        Ok(count == 0)
    }

    /// Small demo catalog used by `--seed-demo`
    pub fn seed_demo_catalog(&self) -> Result<(), StoreError> {
        self.insert_root_category(1, "de_DE")?;

        let categories = [
            (1, 100, "Fashion", None, false),
            (2, 110, "Shoes", Some(1), false),
            (3, 111, "Running Shoes", Some(2), true),
            (4, 112, "Hiking Shoes", Some(2), true),
            (5, 120, "Shirts", Some(1), false),
            (6, 121, "T-Shirts", Some(5), true),
            (7, 200, "Garden", None, false),
            (8, 210, "Garden Shoes", Some(7), true),
        ];
        for (id, number, name, parent, is_leaf) in categories {
            self.insert_category(&CategoryRecord {
                id,
                category_number: number,
                name: name.to_string(),
                path: name.to_string(),
                is_leaf,
                root_category_id: 1,
                parent_id: parent,
            })?;
        }

        self.insert_article(1, "A-1000")?;
        self.map_article_to_category(1, 3)?;

        let attributes = [
            (1, "Colour", "String", 1, 1),
            (2, "Material", "String", 1, 3),
            (3, "Upper material", "String", 0, 1),
            (4, "Sole material", "String", 0, 1),
            (5, "Size", "Decimal", 1, 1),
        ];
        for (id, name, value_type, min_values, max_values) in attributes {
            self.insert_attribute(&AttributeRecord {
                id,
                name: name.to_string(),
                value_type: value_type.to_string(),
                min_values,
                max_values,
                marketplace_attribute_ids: String::new(),
                root_category_id: 1,
            })?;
        }
        self.link_sub_attribute(2, 3)?;
        self.link_sub_attribute(2, 4)?;

        log::info!("Seeded demo catalog");
        Ok(())
    }
}
