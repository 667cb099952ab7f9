//! Positional placeholder rendering.
//!
//! The engine emits dialect-neutral `{i}` placeholders. Drivers want their
//! own syntax: `?N` for SQLite, `$N` for PostgreSQL (both 1-based).
//! Text inside string literals and quoted identifiers is never rewritten.

use std::borrow::Cow;
use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Deserialize;

use super::errors::RecursiveQueryError;
use super::types::CompiledRecursiveQuery;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{(\d+)\}").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `?1, ?2, ...` (SQLite)
    QuestionNumbered,
    /// `$1, $2, ...` (PostgreSQL)
    DollarNumbered,
}

impl PlaceholderStyle {
    fn render(self, index: usize) -> String {
        match self {
            PlaceholderStyle::QuestionNumbered => format!("?{}", index + 1),
            PlaceholderStyle::DollarNumbered => format!("${}", index + 1),
        }
    }
}

/// Split `sql` into `(quoted, text)` runs. Quoted runs keep their quotes;
/// a doubled quote closes one run and opens the next.
fn quoting_runs(sql: &str) -> Vec<(bool, &str)> {
    let mut runs = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in sql.char_indices() {
        match quote {
            Some(q) if c == q => {
                let end = i + c.len_utf8();
                runs.push((true, &sql[start..end]));
                start = end;
                quote = None;
            }
            Some(_) => {}
            None if c == '\'' || c == '"' => {
                runs.push((false, &sql[start..i]));
                start = i;
                quote = Some(c);
            }
            None => {}
        }
    }
    runs.push((quote.is_some(), &sql[start..]));
    runs
}

/// Distinct placeholder indices used in `sql`, ascending
pub fn placeholder_indices(sql: &str) -> Vec<usize> {
    quoting_runs(sql)
        .into_iter()
        .filter(|(quoted, _)| !quoted)
        .flat_map(|(_, text)| PLACEHOLDER.captures_iter(text))
        .filter_map(|c| c[1].parse::<usize>().ok())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl CompiledRecursiveQuery {
    /// Render the statement with driver-native placeholders.
    ///
    /// Fails if the text refers to a parameter index that has no value.
    pub fn to_native(&self, style: PlaceholderStyle) -> Result<String, RecursiveQueryError> {
        if let Some(&index) = placeholder_indices(&self.sql_text)
            .iter()
            .find(|&&i| i >= self.parameters.len())
        {
            return Err(RecursiveQueryError::MalformedSeedQuery(format!(
                "placeholder {{{}}} has no parameter ({} bound)",
                index,
                self.parameters.len()
            )));
        }

        Ok(quoting_runs(&self.sql_text)
            .into_iter()
            .map(|(quoted, text)| {
                if quoted {
                    Cow::Borrowed(text)
                } else {
                    PLACEHOLDER.replace_all(text, |caps: &Captures| match caps[1].parse::<usize>() {
                        Ok(index) => style.render(index),
                        Err(_) => caps[0].to_string(),
                    })
                }
            })
            .collect())
    }
}
