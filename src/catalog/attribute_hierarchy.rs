use std::collections::HashSet;

use super::errors::CatalogError;
use super::service::CatalogService;
use crate::schema_catalog::product_catalog::{ATTRIBUTE, NAV_SUB_ATTRIBUTES};
use crate::seed_query::Filter;
use crate::store::AttributeRecord;

impl CatalogService {
    /// The requested attributes together with all of their sub-attributes,
    /// at any depth, ordered by id.
    ///
    /// Fails when any requested id does not exist.
    pub fn attribute_hierarchy(
        &self,
        attribute_ids: &[i64],
    ) -> Result<Vec<AttributeRecord>, CatalogError> {
        if attribute_ids.is_empty() {
            return Err(CatalogError::InvalidRequest(
                "At least one attribute id is required".to_string(),
            ));
        }

        let compiled = self.engine.compile_recursive_query(
            ATTRIBUTE,
            &Filter::is_in("id", attribute_ids.iter().copied()),
            NAV_SUB_ATTRIBUTES,
        )?;
        let mut attributes = self.store.query_attributes(&compiled)?;

        let found: HashSet<i64> = attributes.iter().map(|a| a.id).collect();
        let mut missing: Vec<i64> = attribute_ids
            .iter()
            .copied()
            .filter(|id| !found.contains(id))
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            missing.dedup();
            return Err(CatalogError::AttributeIdsNotFound(missing));
        }

        attributes.sort_by_key(|a| a.id);
        log::debug!(
            "Loaded {} attributes for {} requested ids",
            attributes.len(),
            attribute_ids.len()
        );
        Ok(attributes)
    }
}
