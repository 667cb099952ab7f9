use serde::Serialize;
use serde_json::Value;

use crate::utils::identifiers::{quote_identifier, unquote_identifier};

/// A physical column and its quoted form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub name: String,
    pub quoted: String,
}

impl ColumnRef {
    pub fn new(name: &str) -> Self {
        ColumnRef {
            name: unquote_identifier(name),
            quoted: quote_identifier(name),
        }
    }

    /// `<table>.<column>` with an already quoted table (or CTE) name
    pub fn qualified_by(&self, quoted_table: &str) -> String {
        format!("{}.{}", quoted_table, self.quoted)
    }
}

pub fn column_refs<S: AsRef<str>>(names: &[S]) -> Vec<ColumnRef> {
    names.iter().map(|n| ColumnRef::new(n.as_ref())).collect()
}

/// Which way a direct self-reference is walked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalDirection {
    /// Dependent -> principal, e.g. `parent` (ancestors)
    TowardsPrincipal,
    /// Principal -> dependents, e.g. `children` (descendants)
    TowardsDependents,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipKind {
    DirectSelfReference {
        direction: TraversalDirection,
    },
    ManyToManyViaJoin {
        join_table: String,
        /// Columns of the join table referencing the next hop
        inverse_foreign_key_columns: Vec<ColumnRef>,
    },
}

/// Resolved shape of a recursive navigation.
///
/// For a direct self-reference both column sets live on the subject table.
/// For a many-to-many relationship `principal_key_columns` are the subject's
/// key and `foreign_key_columns` are the forward columns on the join table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipDescriptor {
    pub kind: RelationshipKind,
    pub principal_key_columns: Vec<ColumnRef>,
    pub foreign_key_columns: Vec<ColumnRef>,
}

impl RelationshipDescriptor {
    pub fn is_many_to_many(&self) -> bool {
        matches!(self.kind, RelationshipKind::ManyToManyViaJoin { .. })
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            RelationshipKind::DirectSelfReference {
                direction: TraversalDirection::TowardsPrincipal,
            } => "direct self-reference (ascending)",
            RelationshipKind::DirectSelfReference {
                direction: TraversalDirection::TowardsDependents,
            } => "direct self-reference (descending)",
            RelationshipKind::ManyToManyViaJoin { .. } => "many-to-many via join",
        }
    }
}

/// Seed SQL rewritten into a self-contained anchor fragment.
///
/// Every `{i}` placeholder in `sql_text` has a value at index `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeed {
    pub sql_text: String,
    pub positional_parameters: Vec<Value>,
}

/// Final, directly executable recursive statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledRecursiveQuery {
    pub sql_text: String,
    pub parameters: Vec<Value>,
}
