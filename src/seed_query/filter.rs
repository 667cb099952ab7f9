use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter predicate over the columns of a single entity.
///
/// This is the input of the seed query compiler: the non-recursive part of a
/// hierarchy query ("which rows does the closure start from").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Filter {
    /// `column = value` (`column IS NULL` for a null value)
    Eq { column: String, value: Value },
    /// Case-insensitive substring match on a text column
    ContainsIgnoreCase { column: String, term: String },
    /// `column IN (values...)`
    In { column: String, values: Vec<Value> },
    And { filters: Vec<Filter> },
    Or { filters: Vec<Filter> },
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn contains_ignore_case(column: impl Into<String>, term: impl Into<String>) -> Self {
        Filter::ContainsIgnoreCase {
            column: column.into(),
            term: term.into(),
        }
    }

    pub fn is_in<V: Into<Value>>(column: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Filter::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And { filters }
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or { filters }
    }

    /// All column names the predicate touches
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Filter::Eq { column, .. }
            | Filter::ContainsIgnoreCase { column, .. }
            | Filter::In { column, .. } => vec![column.as_str()],
            Filter::And { filters } | Filter::Or { filters } => {
                filters.iter().flat_map(Filter::columns).collect()
            }
        }
    }
}
