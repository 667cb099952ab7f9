//! # Recursive Query Error Types
//!
//! Every failure of the hierarchy query engine is a defect in metadata, in the
//! seed compiler's output or in the executed closure, never an expected runtime
//! condition. Errors are propagated, never retried, and there is no partial
//! success: either a complete statement (or forest) is produced or the call fails.

use thiserror::Error;

use crate::schema_catalog::SchemaCatalogError;
use crate::seed_query::SeedCompileError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecursiveQueryError {
    #[error("Navigation `{entity}.{navigation}` is not a recursive relationship: {reason}")]
    InvalidRecursiveRelationship {
        entity: String,
        navigation: String,
        reason: String,
    },
    #[error("Malformed seed query: {0}")]
    MalformedSeedQuery(String),
    #[error("Incomplete metadata for `{entity}`: {reason}")]
    IncompleteMetadata { entity: String, reason: String },
    #[error("Row with key {key} is missing from the closure result{}", parent_of(.referenced_by))]
    MissingRow { key: i64, referenced_by: Option<i64> },
    #[error("Row with key {0} appears more than once in the closure result")]
    DuplicateRow(i64),
    #[error("Cycle detected while walking up from key {0}")]
    CyclicHierarchy(i64),
    #[error(transparent)]
    Schema(#[from] SchemaCatalogError),
    #[error(transparent)]
    SeedCompile(#[from] SeedCompileError),
}

fn parent_of(referenced_by: &Option<i64>) -> String {
    match referenced_by {
        Some(child) => format!(" (parent of {})", child),
        None => String::new(),
    }
}

impl RecursiveQueryError {
    pub fn invalid_relationship(
        entity: impl Into<String>,
        navigation: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RecursiveQueryError::InvalidRecursiveRelationship {
            entity: entity.into(),
            navigation: navigation.into(),
            reason: reason.into(),
        }
    }

    pub fn incomplete_metadata(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        RecursiveQueryError::IncompleteMetadata {
            entity: entity.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by what the caller asked for rather than by a
    /// defect inside the engine or its metadata.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RecursiveQueryError::InvalidRecursiveRelationship { .. }
                | RecursiveQueryError::SeedCompile(_)
                | RecursiveQueryError::Schema(SchemaCatalogError::UnknownEntity { .. })
        )
    }
}
