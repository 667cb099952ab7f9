//! # Catalog Use Case Errors
//!
//! Request and lookup failures are reported to the client as-is; engine and
//! store failures are internal defects.

use thiserror::Error;

use crate::recursive_query::RecursiveQueryError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("No categories found in root category {root_category_id} for {criterion}")]
    NoResultsForCategorySearch {
        root_category_id: i64,
        criterion: String,
    },
    #[error("Category {category_number} not found in root category {root_category_id}")]
    CategoryNotFound {
        root_category_id: i64,
        category_number: i64,
    },
    #[error("Attribute ids not found: {}", join_ids(.0))]
    AttributeIdsNotFound(Vec<i64>),
    #[error(transparent)]
    Query(#[from] RecursiveQueryError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter().map(i64::to_string).collect::<Vec<_>>().join(", ")
}

impl From<validator::ValidationErrors> for CatalogError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CatalogError::InvalidRequest(errors.to_string())
    }
}
