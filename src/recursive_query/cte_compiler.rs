//! Recursive CTE assembly.
//!
//! Wraps a normalized seed in `WITH RECURSIVE`: the seed is the anchor, the
//! recursive step joins the entity (or its join entity) back onto the CTE
//! along the resolved relationship, and the final select returns full entity
//! rows for every key in the closure.

use super::errors::RecursiveQueryError;
use super::types::{
    column_refs, ColumnRef, CompiledRecursiveQuery, NormalizedSeed, RelationshipDescriptor,
    RelationshipKind, TraversalDirection,
};
use crate::schema_catalog::EntityMetadata;
use crate::utils::identifiers::quote_identifier;

/// Name of the recursive CTE in every compiled statement
pub const RECURSIVE_CTE_NAME: &str = "recursiveCte";

/// Generates the recursive CTE statement for one resolved relationship
pub struct RecursiveCteGenerator<'a> {
    pub relationship: &'a RelationshipDescriptor,
    pub cte_name: String,        // quoted CTE name
    pub table: String,           // quoted subject table
    pub columns: Vec<ColumnRef>, // all subject columns, catalog order
    pub primary_key: Vec<ColumnRef>,
}

impl<'a> RecursiveCteGenerator<'a> {
    /// Validate metadata up front; nothing is assembled from incomplete input.
    pub fn new(
        entity: &EntityMetadata,
        relationship: &'a RelationshipDescriptor,
    ) -> Result<Self, RecursiveQueryError> {
        let incomplete = |reason: &str| RecursiveQueryError::incomplete_metadata(&entity.name, reason);

        if entity.columns.is_empty() {
            return Err(incomplete("entity has no columns"));
        }
        if entity.primary_key.is_empty() {
            return Err(incomplete("entity has no primary key"));
        }
        if relationship.foreign_key_columns.is_empty()
            || relationship.principal_key_columns.is_empty()
        {
            return Err(incomplete("relationship has no foreign key columns"));
        }
        if relationship.foreign_key_columns.len() != relationship.principal_key_columns.len() {
            return Err(incomplete(
                "foreign key and principal key column counts differ",
            ));
        }
        if let RelationshipKind::ManyToManyViaJoin {
            inverse_foreign_key_columns,
            ..
        } = &relationship.kind
        {
            if inverse_foreign_key_columns.len() != entity.primary_key.len() {
                return Err(incomplete(
                    "inverse foreign key does not cover the primary key",
                ));
            }
        }

        Ok(Self {
            relationship,
            cte_name: quote_identifier(RECURSIVE_CTE_NAME),
            table: quote_identifier(&entity.table),
            columns: column_refs(&entity.columns),
            primary_key: column_refs(&entity.primary_key),
        })
    }

    /// Columns of the CTE (and of the anchor select)
    fn cte_columns(&self) -> &[ColumnRef] {
        if self.relationship.is_many_to_many() {
            &self.primary_key
        } else {
            &self.columns
        }
    }

    /// Select list of the recursive step
    fn step_columns(&self) -> Vec<String> {
        match &self.relationship.kind {
            RelationshipKind::DirectSelfReference { .. } => qualify(&self.columns, &self.table),
            RelationshipKind::ManyToManyViaJoin {
                join_table,
                inverse_foreign_key_columns,
            } => qualify(inverse_foreign_key_columns, &quote_identifier(join_table)),
        }
    }

    /// JOIN of the recursive step, advancing one hop from the CTE
    fn step_join(&self) -> String {
        let principal = &self.relationship.principal_key_columns;
        let dependent = &self.relationship.foreign_key_columns;
        match &self.relationship.kind {
            // the previous row's foreign key finds its principal
            RelationshipKind::DirectSelfReference {
                direction: TraversalDirection::TowardsPrincipal,
            } => join_on(&self.table, &self.table, principal, &self.cte_name, dependent),
            // rows whose foreign key points at the previous row
            RelationshipKind::DirectSelfReference {
                direction: TraversalDirection::TowardsDependents,
            } => join_on(&self.table, &self.cte_name, principal, &self.table, dependent),
            RelationshipKind::ManyToManyViaJoin { join_table, .. } => {
                let join_table = quote_identifier(join_table);
                join_on(&join_table, &self.cte_name, principal, &join_table, dependent)
            }
        }
    }

    /// Final select list and the join re-attaching full rows (many-to-many only)
    fn final_projection(&self) -> (Vec<String>, Option<String>) {
        if self.relationship.is_many_to_many() {
            (
                qualify(&self.columns, &self.table),
                Some(join_on(
                    &self.table,
                    &self.cte_name,
                    &self.primary_key,
                    &self.table,
                    &self.primary_key,
                )),
            )
        } else {
            (quoted(&self.columns), None)
        }
    }

    pub fn generate_sql(&self, anchor: &str) -> String {
        let (final_columns, final_join) = self.final_projection();
        let mut final_select = format!("SELECT {} FROM {}", final_columns.join(", "), self.cte_name);
        if let Some(join) = final_join {
            final_select.push(' ');
            final_select.push_str(&join);
        }

        format!(
            "SELECT * FROM (WITH RECURSIVE {cte} ({cte_columns}) AS ({anchor} UNION SELECT {step_columns} FROM {cte} {step_join}) {final_select}) t",
            cte = self.cte_name,
            cte_columns = quoted(self.cte_columns()).join(", "),
            anchor = anchor,
            step_columns = self.step_columns().join(", "),
            step_join = self.step_join(),
            final_select = final_select,
        )
    }
}

fn quoted(columns: &[ColumnRef]) -> Vec<String> {
    columns.iter().map(|c| c.quoted.clone()).collect()
}

fn qualify(columns: &[ColumnRef], table: &str) -> Vec<String> {
    columns.iter().map(|c| c.qualified_by(table)).collect()
}

/// `JOIN <target> ON l.a1 = r.b1 AND l.a2 = r.b2 ...`
fn join_on(
    target: &str,
    left_table: &str,
    left_columns: &[ColumnRef],
    right_table: &str,
    right_columns: &[ColumnRef],
) -> String {
    let predicates: Vec<String> = left_columns
        .iter()
        .zip(right_columns)
        .map(|(l, r)| format!("{} = {}", l.qualified_by(left_table), r.qualified_by(right_table)))
        .collect();
    format!("JOIN {} ON {}", target, predicates.join(" AND "))
}

/// Combine a normalized seed and a relationship into the executable statement.
///
/// The parameters are exactly the seed's, in the same order.
pub fn compile(
    seed: NormalizedSeed,
    relationship: &RelationshipDescriptor,
    entity: &EntityMetadata,
) -> Result<CompiledRecursiveQuery, RecursiveQueryError> {
    let generator = RecursiveCteGenerator::new(entity, relationship)?;
    Ok(CompiledRecursiveQuery {
        sql_text: generator.generate_sql(&seed.sql_text),
        parameters: seed.positional_parameters,
    })
}
