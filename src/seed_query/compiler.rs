//! Seed query compilation.
//!
//! Turns a [`Filter`] over one entity into a plain, parameterized `SELECT`.
//! The output deliberately looks like what an ORM's "show me the SQL" hook
//! prints: a parameter-declaration preamble, an optional diagnostic comment
//! and a multi-line statement. The recursive query engine only relies on the
//! [`SeedQueryCompiler`] contract and normalizes whatever it receives.

use serde_json::{Map, Value};
use thiserror::Error;

use super::filter::Filter;
use crate::schema_catalog::EntityMetadata;
use crate::utils::identifiers::{qualified_column, quote_identifier};

/// Marker of the diagnostic comment emitted in split-query mode.
/// Lines containing it are never part of the executable statement.
pub const DIAGNOSTIC_MARKER: &str =
    "This query is being executed in split-query mode, and the SQL shown is for the first query to be executed.";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SeedCompileError {
    #[error("Column '{column}' is not mapped on entity '{entity}'")]
    UnknownColumn { entity: String, column: String },
    #[error("Unsupported filter value for column '{column}': {value}")]
    UnsupportedValue { column: String, value: String },
}

/// Parameterized SQL for the non-recursive part of a hierarchy query.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedQuery {
    pub sql_text: String,
    /// Parameter name (without `@`) -> value, in the compiler's enumeration order
    pub named_parameters: Map<String, Value>,
}

/// Produces the seed `SELECT` for a filter over an entity.
///
/// Implementations must return a plain (non-recursive) `SELECT` of the
/// entity's columns, in catalog order, with named `@name` parameters.
#[cfg_attr(test, mockall::automock)]
pub trait SeedQueryCompiler: Send + Sync {
    fn compile(&self, entity: &EntityMetadata, filter: &Filter) -> Result<SeedQuery, SeedCompileError>;
}

/// Default [`SeedQueryCompiler`] rendering [`Filter`] trees.
#[derive(Debug, Clone, Default)]
pub struct FilterCompiler {
    /// Emit the split-query diagnostic comment before the statement
    pub split_query: bool,
}

impl FilterCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_split_query(mut self, split_query: bool) -> Self {
        self.split_query = split_query;
        self
    }
}

impl SeedQueryCompiler for FilterCompiler {
    fn compile(&self, entity: &EntityMetadata, filter: &Filter) -> Result<SeedQuery, SeedCompileError> {
        for column in filter.columns() {
            if !entity.has_column(column) {
                return Err(SeedCompileError::UnknownColumn {
                    entity: entity.name.clone(),
                    column: column.to_string(),
                });
            }
        }

        let alias = table_alias(&entity.table);
        let mut params = Map::new();
        let predicate = render_filter(filter, &alias, &mut params)?;

        let mut lines = Vec::with_capacity(params.len() + 4);
        for (name, value) in &params {
            lines.push(format!("-- @{}={}", name, declaration_literal(value)));
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        if self.split_query {
            lines.push(format!("-- {}", DIAGNOSTIC_MARKER));
        }

        let select_list = entity
            .columns
            .iter()
            .map(|c| qualified_column(&alias, c))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("SELECT {}", select_list));
        lines.push(format!(
            "FROM {} AS {}",
            quote_identifier(&entity.table),
            quote_identifier(&alias)
        ));
        lines.push(format!("WHERE {}", predicate));

        Ok(SeedQuery {
            sql_text: lines.join("\n"),
            named_parameters: params,
        })
    }
}

fn table_alias(table: &str) -> String {
    table
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase().to_string())
        .unwrap_or_else(|| "t".to_string())
}

fn bind(params: &mut Map<String, Value>, value: Value) -> String {
    let name = format!("p{}", params.len());
    let placeholder = format!("@{}", name);
    params.insert(name, value);
    placeholder
}

fn render_filter(
    filter: &Filter,
    alias: &str,
    params: &mut Map<String, Value>,
) -> Result<String, SeedCompileError> {
    match filter {
        Filter::Eq { column, value } => {
            check_scalar(column, value)?;
            let col = qualified_column(alias, column);
            if value.is_null() {
                Ok(format!("{} IS NULL", col))
            } else {
                Ok(format!("{} = {}", col, bind(params, value.clone())))
            }
        }
        Filter::ContainsIgnoreCase { column, term } => {
            let col = qualified_column(alias, column);
            let placeholder = bind(params, Value::String(escape_like(term)));
            Ok(format!(
                "lower({}) LIKE '%' || lower({}) || '%' ESCAPE '{}'",
                col, placeholder, LIKE_ESCAPE
            ))
        }
        Filter::In { column, values } => {
            if values.is_empty() {
                return Ok("1 = 0".to_string());
            }
            let mut placeholders = Vec::with_capacity(values.len());
            for value in values {
                check_scalar(column, value)?;
                placeholders.push(bind(params, value.clone()));
            }
            Ok(format!(
                "{} IN ({})",
                qualified_column(alias, column),
                placeholders.join(", ")
            ))
        }
        Filter::And { filters } => render_group(filters, " AND ", "1 = 1", alias, params),
        Filter::Or { filters } => render_group(filters, " OR ", "1 = 0", alias, params),
    }
}

fn render_group(
    filters: &[Filter],
    separator: &str,
    empty: &str,
    alias: &str,
    params: &mut Map<String, Value>,
) -> Result<String, SeedCompileError> {
    if filters.is_empty() {
        return Ok(empty.to_string());
    }
    let mut parts = Vec::with_capacity(filters.len());
    for filter in filters {
        let rendered = render_filter(filter, alias, params)?;
        match filter {
            Filter::And { filters } | Filter::Or { filters } if filters.len() > 1 => {
                parts.push(format!("({})", rendered))
            }
            _ => parts.push(rendered),
        }
    }
    Ok(parts.join(separator))
}

fn check_scalar(column: &str, value: &Value) -> Result<(), SeedCompileError> {
    match value {
        Value::Array(_) | Value::Object(_) => Err(SeedCompileError::UnsupportedValue {
            column: column.to_string(),
            value: value.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Escape character of every `LIKE` pattern the compiler renders
const LIKE_ESCAPE: char = '\\';

/// Make `%`, `_` and the escape character match themselves
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Single-line quoted literal for the preamble. Line breaks and other
/// control characters are written as escapes so a value can never start a
/// line of its own.
fn declaration_literal(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let mut literal = String::with_capacity(text.len() + 2);
    literal.push('\'');
    for c in text.chars() {
        match c {
            '\'' => literal.push_str("''"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            c if c.is_control() => literal.extend(c.escape_unicode()),
            c => literal.push(c),
        }
    }
    literal.push('\'');
    literal
}
