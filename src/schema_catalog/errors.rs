//! # Schema Catalog Error Types
//!
//! Errors raised while loading or validating entity metadata.
//!
//! ## Error Categories
//!
//! - **Lookup Errors**: unknown entity, foreign key or navigation
//! - **Definition Errors**: metadata that references columns or entities that do not exist
//! - **Configuration Errors**: file I/O and YAML parsing issues
//!
//! Lookup errors are defects in the caller (asking for an entity the catalog
//! never declared), definition errors are defects in the catalog itself.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaCatalogError {
    #[error("No entity metadata found for `{entity}`")]
    UnknownEntity { entity: String },
    #[error("No foreign key named `{foreign_key}` in the catalog")]
    UnknownForeignKey { foreign_key: String },
    #[error("Entity `{entity}` has no navigation named `{navigation}`")]
    UnknownNavigation { entity: String, navigation: String },
    #[error("Invalid entity definition: column '{column}' not found in table '{table}'")]
    InvalidColumn { column: String, table: String },
    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },
    #[error("Failed to read catalog file: {error}")]
    ConfigReadError { error: String },
    #[error("Failed to parse catalog: {error}")]
    ConfigParseError { error: String },
    #[error("Invalid catalog: {message}")]
    InvalidConfig { message: String },
}

impl SchemaCatalogError {
    /// Create an InvalidConfig error carrying the entity it was raised for
    pub fn invalid_entity(entity: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaCatalogError::InvalidConfig {
            message: format!("{}\n  Context: entity `{}`", message.into(), entity.into()),
        }
    }
}
