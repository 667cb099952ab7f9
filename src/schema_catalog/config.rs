/// Schema catalog configuration loading.
///
/// Entity metadata can be supplied as YAML with the following structure:
///
/// ```yaml
/// name: product_catalog          # Optional catalog name
/// entities:
///   - name: category             # Logical entity name
///     table: category            # Physical table
///     columns: [id, name, parent_id]
///     primary_key: [id]
///     foreign_keys:
///       - name: fk_category_parent
///         columns: [parent_id]
///         principal_entity: category
///         principal_columns: [id]
///     navigations:
///       - name: parent
///         foreign_key: fk_category_parent
///         points_to_principal: true
///       - name: children
///         foreign_key: fk_category_parent
/// ```
///
/// Loading validates every cross reference (see [`SchemaCatalog::new`]).
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::catalog::SchemaCatalog;
use super::entity::EntityMetadata;
use super::errors::SchemaCatalogError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaCatalogConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub entities: Vec<EntityMetadata>,
}

impl SchemaCatalogConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaCatalogError> {
        let contents =
            fs::read_to_string(path).map_err(|e| SchemaCatalogError::ConfigReadError {
                error: e.to_string(),
            })?;

        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaCatalogError> {
        serde_yaml::from_str(yaml).map_err(|e| SchemaCatalogError::ConfigParseError {
            error: e.to_string(),
        })
    }

    pub fn to_catalog(self) -> Result<SchemaCatalog, SchemaCatalogError> {
        if self.entities.is_empty() {
            return Err(SchemaCatalogError::InvalidConfig {
                message: "Catalog must contain at least one entity definition".to_string(),
            });
        }
        log::debug!(
            "Building schema catalog '{}' with {} entities",
            self.name.as_deref().unwrap_or("default"),
            self.entities.len()
        );
        SchemaCatalog::new(self.entities)
    }
}

impl SchemaCatalog {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaCatalogError> {
        SchemaCatalogConfig::from_yaml_str(yaml)?.to_catalog()
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaCatalogError> {
        SchemaCatalogConfig::from_yaml_file(path)?.to_catalog()
    }
}
