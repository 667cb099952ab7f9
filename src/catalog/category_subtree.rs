use super::errors::CatalogError;
use super::service::CatalogService;
use crate::schema_catalog::product_catalog::{CATEGORY, NAV_CHILDREN};
use crate::seed_query::Filter;
use crate::store::CategoryRecord;

impl CatalogService {
    /// A category and all of its descendants, ordered by category number.
    pub fn category_subtree(
        &self,
        root_category_id: i64,
        category_number: i64,
    ) -> Result<Vec<CategoryRecord>, CatalogError> {
        let filter = Filter::and(vec![
            Filter::eq("root_category_id", root_category_id),
            Filter::eq("category_number", category_number),
        ]);
        let compiled = self
            .engine
            .compile_recursive_query(CATEGORY, &filter, NAV_CHILDREN)?;

        let mut categories = self.store.query_categories(&compiled)?;
        if categories.is_empty() {
            return Err(CatalogError::CategoryNotFound {
                root_category_id,
                category_number,
            });
        }
        categories.sort_by_key(|c| c.category_number);
        Ok(categories)
    }
}
