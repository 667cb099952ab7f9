//! Relationship resolution.
//!
//! Classifies a named navigation as a direct self-reference or a
//! many-to-many relationship through a join table, and extracts the column
//! sets the CTE compiler joins on.

use super::errors::RecursiveQueryError;
use super::types::{
    column_refs, RelationshipDescriptor, RelationshipKind, TraversalDirection,
};
use crate::schema_catalog::SchemaCatalog;

/// Resolve `entity.navigation` into a [`RelationshipDescriptor`].
///
/// Ambiguous many-to-many wiring (zero or several candidate inverse keys on
/// the join entity) is rejected rather than guessed.
pub fn resolve(
    catalog: &SchemaCatalog,
    entity: &str,
    navigation: &str,
) -> Result<RelationshipDescriptor, RecursiveQueryError> {
    let subject = catalog.entity(entity)?;
    let invalid = |reason: String| RecursiveQueryError::invalid_relationship(entity, navigation, reason);

    let nav = subject
        .navigation(navigation)
        .ok_or_else(|| invalid("navigation is not declared on the entity".to_string()))?;
    let (declaring, fk) = catalog
        .foreign_key(&nav.foreign_key)
        .map_err(|e| invalid(e.to_string()))?;

    if declaring.name == subject.name {
        if fk.principal_entity != subject.name {
            return Err(invalid(format!(
                "foreign key `{}` leads to `{}`, not back to `{}`",
                fk.name, fk.principal_entity, subject.name
            )));
        }
        let direction = if nav.points_to_principal {
            TraversalDirection::TowardsPrincipal
        } else {
            TraversalDirection::TowardsDependents
        };
        return Ok(RelationshipDescriptor {
            kind: RelationshipKind::DirectSelfReference { direction },
            principal_key_columns: column_refs(&fk.principal_columns),
            foreign_key_columns: column_refs(&fk.columns),
        });
    }

    // The foreign key lives on another entity: that entity must be a join
    // table pointing back at the subject through exactly one other key.
    if fk.principal_entity != subject.name {
        return Err(invalid(format!(
            "foreign key `{}` on `{}` does not reference `{}`",
            fk.name, declaring.name, subject.name
        )));
    }

    let candidates: Vec<_> = declaring
        .foreign_keys
        .iter()
        .filter(|other| other.name != fk.name && other.principal_entity == subject.name)
        .collect();

    let inverse = match candidates.as_slice() {
        [inverse] => *inverse,
        [] => {
            return Err(invalid(format!(
                "join entity `{}` has no inverse foreign key back to `{}`",
                declaring.name, subject.name
            )))
        }
        many => {
            let names: Vec<&str> = many.iter().map(|k| k.name.as_str()).collect();
            return Err(invalid(format!(
                "join entity `{}` has {} candidate inverse foreign keys ({})",
                declaring.name,
                many.len(),
                names.join(", ")
            )));
        }
    };

    for key in [fk, inverse] {
        if key.principal_columns != subject.primary_key {
            return Err(invalid(format!(
                "foreign key `{}` must reference the primary key of `{}`",
                key.name, subject.name
            )));
        }
    }

    Ok(RelationshipDescriptor {
        kind: RelationshipKind::ManyToManyViaJoin {
            join_table: declaring.table.clone(),
            inverse_foreign_key_columns: column_refs(&inverse.columns),
        },
        principal_key_columns: column_refs(&fk.principal_columns),
        foreign_key_columns: column_refs(&fk.columns),
    })
}
