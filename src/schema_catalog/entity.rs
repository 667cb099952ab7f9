use serde::{Deserialize, Serialize};

/// Table-level metadata for one entity type.
///
/// Column order matters: it is the order the seed compiler selects columns in
/// and the column list of a direct self-referencing recursive CTE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// Logical entity name (e.g. "category")
    pub name: String,
    /// Physical table name, unquoted
    pub table: String,
    /// All mapped columns, in select order
    pub columns: Vec<String>,
    /// Primary key columns
    pub primary_key: Vec<String>,
    /// Foreign keys declared on this entity (this entity is the dependent side)
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyMetadata>,
    /// Navigations reachable from this entity
    #[serde(default)]
    pub navigations: Vec<NavigationMetadata>,
}

/// A foreign key constraint, declared on its dependent entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyMetadata {
    /// Catalog-wide unique name
    pub name: String,
    /// Dependent (referencing) columns
    pub columns: Vec<String>,
    /// Entity that owns the referenced key
    pub principal_entity: String,
    /// Referenced (principal) key columns, pairwise with `columns`
    pub principal_columns: Vec<String>,
}

/// A named navigation over a foreign key.
///
/// The foreign key may be declared on the entity itself (direct reference)
/// or on a join entity (skip navigation through a join table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationMetadata {
    pub name: String,
    pub foreign_key: String,
    /// True when the navigation goes from the dependent row to its principal
    /// (e.g. `parent`), false when it goes from the principal to its dependents
    /// (e.g. `children`, `sub_attributes`).
    #[serde(default)]
    pub points_to_principal: bool,
}

impl EntityMetadata {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn navigation(&self, name: &str) -> Option<&NavigationMetadata> {
        self.navigations.iter().find(|n| n.name == name)
    }

    pub fn foreign_key(&self, name: &str) -> Option<&ForeignKeyMetadata> {
        self.foreign_keys.iter().find(|fk| fk.name == name)
    }
}
