use std::collections::HashMap;

use super::entity::{EntityMetadata, ForeignKeyMetadata, NavigationMetadata};
use super::errors::SchemaCatalogError;

/// Validated, read-only entity metadata for the whole store.
///
/// Built once (from code or YAML) and shared behind `Arc` by every request.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    entities: HashMap<String, EntityMetadata>,
    // foreign key name -> declaring entity name
    foreign_key_owners: HashMap<String, String>,
}

impl SchemaCatalog {
    /// Build a catalog from entity definitions, validating cross references.
    pub fn new(entities: Vec<EntityMetadata>) -> Result<Self, SchemaCatalogError> {
        let mut catalog = SchemaCatalog::default();

        for entity in entities {
            if catalog.entities.contains_key(&entity.name) {
                return Err(SchemaCatalogError::DuplicateName {
                    kind: "entity",
                    name: entity.name,
                });
            }
            for fk in &entity.foreign_keys {
                if catalog
                    .foreign_key_owners
                    .insert(fk.name.clone(), entity.name.clone())
                    .is_some()
                {
                    return Err(SchemaCatalogError::DuplicateName {
                        kind: "foreign key",
                        name: fk.name.clone(),
                    });
                }
            }
            catalog.entities.insert(entity.name.clone(), entity);
        }

        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), SchemaCatalogError> {
        for entity in self.entities.values() {
            if entity.columns.is_empty() {
                return Err(SchemaCatalogError::invalid_entity(
                    &entity.name,
                    "Entity must declare at least one column",
                ));
            }
            for column in &entity.primary_key {
                check_column(entity, column)?;
            }

            for fk in &entity.foreign_keys {
                if fk.columns.len() != fk.principal_columns.len() {
                    return Err(SchemaCatalogError::invalid_entity(
                        &entity.name,
                        format!(
                            "Foreign key '{}' maps {} columns onto {} principal columns",
                            fk.name,
                            fk.columns.len(),
                            fk.principal_columns.len()
                        ),
                    ));
                }
                for column in &fk.columns {
                    check_column(entity, column)?;
                }
                let principal = self.entity(&fk.principal_entity)?;
                for column in &fk.principal_columns {
                    check_column(principal, column)?;
                }
            }

            let mut seen = std::collections::HashSet::new();
            for navigation in &entity.navigations {
                if !seen.insert(&navigation.name) {
                    return Err(SchemaCatalogError::DuplicateName {
                        kind: "navigation",
                        name: format!("{}.{}", entity.name, navigation.name),
                    });
                }
                self.foreign_key(&navigation.foreign_key)?;
            }
        }
        Ok(())
    }

    pub fn entity(&self, name: &str) -> Result<&EntityMetadata, SchemaCatalogError> {
        self.entities
            .get(name)
            .ok_or_else(|| SchemaCatalogError::UnknownEntity {
                entity: name.to_string(),
            })
    }

    /// Find a foreign key by name, together with the entity that declares it.
    pub fn foreign_key(
        &self,
        name: &str,
    ) -> Result<(&EntityMetadata, &ForeignKeyMetadata), SchemaCatalogError> {
        let unknown = || SchemaCatalogError::UnknownForeignKey {
            foreign_key: name.to_string(),
        };
        let owner = self.foreign_key_owners.get(name).ok_or_else(unknown)?;
        let entity = self.entity(owner)?;
        let fk = entity.foreign_key(name).ok_or_else(unknown)?;
        Ok((entity, fk))
    }

    pub fn navigation(
        &self,
        entity: &str,
        navigation: &str,
    ) -> Result<&NavigationMetadata, SchemaCatalogError> {
        self.entity(entity)?
            .navigation(navigation)
            .ok_or_else(|| SchemaCatalogError::UnknownNavigation {
                entity: entity.to_string(),
                navigation: navigation.to_string(),
            })
    }

    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }
}

fn check_column(entity: &EntityMetadata, column: &str) -> Result<(), SchemaCatalogError> {
    if entity.has_column(column) {
        Ok(())
    } else {
        Err(SchemaCatalogError::InvalidColumn {
            column: column.to_string(),
            table: entity.table.clone(),
        })
    }
}
