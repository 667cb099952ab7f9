//! Seed query normalization.
//!
//! Rewrites the seed compiler's output into a single-line anchor fragment:
//! preamble and diagnostic lines are dropped, named parameters become
//! positional `{i}` placeholders and, for many-to-many relationships, the
//! select list is narrowed to the primary key.
//!
//! These are text transformations over one SQL dialect's formatting. They do
//! not parse SQL; they only track quoting and parenthesis depth, which is
//! enough for the plain `SELECT ... FROM ... WHERE ...` seeds they receive.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use serde_json::{Map, Value};

use super::errors::RecursiveQueryError;
use super::types::{ColumnRef, NormalizedSeed, RelationshipDescriptor};
use crate::seed_query::{SeedQuery, DIAGNOSTIC_MARKER};
use crate::utils::identifiers::unquote_identifier;

/// Normalize a seed query into an anchor fragment for the recursive CTE.
///
/// `positional_parameters[i]` is the value of the `i`-th entry of the seed's
/// named parameter map, and `{i}` is what replaced every use of that name.
pub fn normalize(
    seed: SeedQuery,
    relationship: &RelationshipDescriptor,
    primary_key_columns: &[ColumnRef],
) -> Result<NormalizedSeed, RecursiveQueryError> {
    let statement = executable_statement(&seed.sql_text)?;
    let (mut sql_text, positional_parameters) =
        rewrite_named_parameters(&statement, &seed.named_parameters)?;

    if relationship.is_many_to_many() {
        sql_text = narrow_to_primary_key(&sql_text, primary_key_columns)?;
    }

    Ok(NormalizedSeed {
        sql_text,
        positional_parameters,
    })
}

/// Everything from the first `SELECT` line on, one line, single-spaced
fn executable_statement(sql: &str) -> Result<String, RecursiveQueryError> {
    let lines: Vec<&str> = sql
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains(DIAGNOSTIC_MARKER))
        .skip_while(|line| !line.starts_with("SELECT"))
        // a comment line would swallow the rest of the statement once joined
        .filter(|line| !line.starts_with("--"))
        .collect();

    if lines.is_empty() {
        return Err(RecursiveQueryError::MalformedSeedQuery(
            "seed SQL has no line starting with SELECT".to_string(),
        ));
    }
    Ok(lines.join(" "))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn take_word(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut word = String::new();
    while let Some(&c) = chars.peek() {
        if !is_word_char(c) {
            break;
        }
        word.push(c);
        chars.next();
    }
    word
}

/// Copy a quoted identifier or literal up to and including its closing
/// quote. A doubled quote is an escaped quote. Returns false if unterminated.
fn copy_quoted(quote: char, chars: &mut Peekable<Chars<'_>>, out: &mut String) -> bool {
    while let Some(c) = chars.next() {
        out.push(c);
        if c == quote {
            if chars.peek() == Some(&quote) {
                out.push(quote);
                chars.next();
            } else {
                return true;
            }
        }
    }
    false
}

/// Replace `@name` and bare `name` tokens with `{i}`, `i` being the position
/// of `name` in the parameter map.
fn rewrite_named_parameters(
    sql: &str,
    named: &Map<String, Value>,
) -> Result<(String, Vec<Value>), RecursiveQueryError> {
    let positions: HashMap<&str, usize> = named
        .keys()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();
    let mut used = vec![false; named.len()];
    let mut result = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut last_significant: Option<char> = None;

    while let Some(ch) = chars.next() {
        match ch {
            '"' | '\'' => {
                result.push(ch);
                if !copy_quoted(ch, &mut chars, &mut result) {
                    return Err(RecursiveQueryError::MalformedSeedQuery(format!(
                        "unterminated {} in seed SQL",
                        if ch == '"' { "quoted identifier" } else { "string literal" }
                    )));
                }
            }
            '@' => {
                let name = take_word(&mut chars);
                if name.is_empty() {
                    result.push('@');
                } else {
                    let index = *positions.get(name.as_str()).ok_or_else(|| {
                        RecursiveQueryError::MalformedSeedQuery(format!(
                            "parameter @{} has no value",
                            name
                        ))
                    })?;
                    used[index] = true;
                    result.push_str(&format!("{{{}}}", index));
                }
            }
            c if is_word_char(c) => {
                let mut word = c.to_string();
                word.push_str(&take_word(&mut chars));
                let qualified = last_significant == Some('.') || chars.peek() == Some(&'.');
                match positions.get(word.as_str()) {
                    Some(&index) if !qualified => {
                        used[index] = true;
                        result.push_str(&format!("{{{}}}", index));
                    }
                    _ => result.push_str(&word),
                }
            }
            _ => result.push(ch),
        }
        if !ch.is_whitespace() {
            last_significant = Some(ch);
        }
    }

    if let Some(unused) = named.keys().zip(&used).find(|(_, used)| !**used) {
        return Err(RecursiveQueryError::MalformedSeedQuery(format!(
            "parameter @{} is never referenced in the seed SQL",
            unused.0
        )));
    }

    Ok((result, named.values().cloned().collect()))
}

/// Byte offsets of the characters at parenthesis depth 0, outside quotes
fn top_level_chars(sql: &str) -> Vec<(usize, char)> {
    let mut result = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (i, c) in sql.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => result.push((i, c)),
            _ => {}
        }
    }
    result
}

/// Byte offset of the first top-level occurrence of `keyword` as a whole word
fn find_top_level_keyword(sql: &str, keyword: &str) -> Option<usize> {
    top_level_chars(sql).into_iter().find_map(|(i, _)| {
        let candidate = sql.get(i..i + keyword.len())?;
        let before = sql[..i].chars().next_back();
        let after = sql[i + keyword.len()..].chars().next();
        let bounded = !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char);
        (bounded && candidate.eq_ignore_ascii_case(keyword)).then_some(i)
    })
}

fn strip_keyword<'a>(sql: &'a str, keyword: &str) -> Option<&'a str> {
    let head = sql.get(..keyword.len())?;
    let rest = &sql[keyword.len()..];
    if head.eq_ignore_ascii_case(keyword) && rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn split_top_level_commas(sql: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in top_level_chars(sql) {
        if c == ',' {
            parts.push(sql[start..i].trim());
            start = i + 1;
        }
    }
    parts.push(sql[start..].trim());
    parts
}

/// Unqualified, unquoted name of the column a select item reads
fn source_column_name(item: &str) -> String {
    let expr = match find_top_level_keyword(item, "AS") {
        Some(pos) => item[..pos].trim(),
        None => item.trim(),
    };
    let last_dot = top_level_chars(expr)
        .into_iter()
        .filter(|(_, c)| *c == '.')
        .last()
        .map(|(i, _)| i);
    match last_dot {
        Some(pos) => unquote_identifier(&expr[pos + 1..]),
        None => unquote_identifier(expr),
    }
}

/// Keep only the primary-key columns of the select list, in key order
fn narrow_to_primary_key(
    sql: &str,
    primary_key_columns: &[ColumnRef],
) -> Result<String, RecursiveQueryError> {
    let malformed = |reason: &str| RecursiveQueryError::MalformedSeedQuery(reason.to_string());

    let from = find_top_level_keyword(sql, "FROM")
        .ok_or_else(|| malformed("seed SQL has no top-level FROM"))?;
    let select_list = strip_keyword(sql[..from].trim(), "SELECT")
        .ok_or_else(|| malformed("seed SQL does not start with SELECT"))?;
    let tail = sql[from + "FROM".len()..].trim();

    let (distinct, select_list) = match strip_keyword(select_list, "DISTINCT") {
        Some(rest) => ("DISTINCT ", rest),
        None => ("", select_list),
    };

    let items = split_top_level_commas(select_list);
    let mut kept = Vec::with_capacity(primary_key_columns.len());
    for key in primary_key_columns {
        let item = items
            .iter()
            .find(|item| source_column_name(item).eq_ignore_ascii_case(&key.name))
            .ok_or_else(|| {
                RecursiveQueryError::MalformedSeedQuery(format!(
                    "seed SQL does not select primary key column {}",
                    key.quoted
                ))
            })?;
        kept.push(*item);
    }
    if kept.is_empty() {
        return Err(malformed("narrowed select list is empty"));
    }

    Ok(format!("SELECT {}{} FROM {}", distinct, kept.join(", "), tail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recursive_query::types::{column_refs, RelationshipKind, TraversalDirection};
    use crate::schema_catalog::EntityMetadata;
    use crate::seed_query::{Filter, FilterCompiler, SeedQueryCompiler};
    use serde_json::json;

    fn direct() -> RelationshipDescriptor {
        RelationshipDescriptor {
            kind: RelationshipKind::DirectSelfReference {
                direction: TraversalDirection::TowardsPrincipal,
            },
            principal_key_columns: column_refs(&["id"]),
            foreign_key_columns: column_refs(&["parent_id"]),
        }
    }

    fn many_to_many() -> RelationshipDescriptor {
        RelationshipDescriptor {
            kind: RelationshipKind::ManyToManyViaJoin {
                join_table: "link".to_string(),
                inverse_foreign_key_columns: column_refs(&["to_id"]),
            },
            principal_key_columns: column_refs(&["id"]),
            foreign_key_columns: column_refs(&["from_id"]),
        }
    }

    fn seed(sql: &str, params: Value) -> SeedQuery {
        SeedQuery {
            sql_text: sql.to_string(),
            named_parameters: params.as_object().cloned().unwrap_or_default(),
        }
    }

    fn pk() -> Vec<ColumnRef> {
        column_refs(&["id"])
    }

    #[test]
    fn test_single_parameter_becomes_positional() {
        let normalized = normalize(
            seed(r#"SELECT "t"."id" FROM "t" WHERE "t"."id" = @p0"#, json!({"p0": 7})),
            &direct(),
            &pk(),
        )
        .unwrap();

        assert_eq!(normalized.sql_text, r#"SELECT "t"."id" FROM "t" WHERE "t"."id" = {0}"#);
        assert_eq!(normalized.positional_parameters, vec![json!(7)]);
    }

    #[test]
    fn test_preamble_and_diagnostic_lines_are_dropped() {
        let sql = format!(
            "-- @p0='3'\r\n\r\n-- {}\r\nSELECT \"n\".\"id\", \"n\".\"parent_id\"\r\n  FROM \"node\" AS \"n\"\r\n  WHERE \"n\".\"id\" = @p0",
            DIAGNOSTIC_MARKER
        );
        let normalized = normalize(seed(&sql, json!({"p0": 3})), &direct(), &pk()).unwrap();

        assert_eq!(
            normalized.sql_text,
            r#"SELECT "n"."id", "n"."parent_id" FROM "node" AS "n" WHERE "n"."id" = {0}"#
        );
    }

    #[test]
    fn test_compiler_output_normalizes_with_aligned_parameters() {
        let entity = EntityMetadata {
            name: "node".to_string(),
            table: "node".to_string(),
            columns: vec!["id".to_string(), "label".to_string()],
            primary_key: vec!["id".to_string()],
            foreign_keys: vec![],
            navigations: vec![],
        };
        let filter = Filter::and(vec![
            Filter::is_in("id", [4, 5, 6]),
            Filter::contains_ignore_case("label", "leaf"),
        ]);
        let compiled = FilterCompiler::new()
            .with_split_query(true)
            .compile(&entity, &filter)
            .unwrap();

        let normalized = normalize(compiled, &direct(), &pk()).unwrap();

        assert!(!normalized.sql_text.contains('@'));
        for i in 0..4 {
            assert!(normalized.sql_text.contains(&format!("{{{}}}", i)));
        }
        assert_eq!(
            normalized.positional_parameters,
            vec![json!(4), json!(5), json!(6), json!("leaf")]
        );
    }

    #[test]
    fn test_parameter_names_match_whole_tokens_only() {
        let params: Value = (0..11)
            .map(|i| (format!("p{}", i), json!(i * 10)))
            .collect::<Map<String, Value>>()
            .into();
        let conditions: Vec<String> = (0..11).rev().map(|i| format!("x = @p{}", i)).collect();
        let sql = format!("SELECT x FROM t WHERE {}", conditions.join(" OR "));

        let normalized = normalize(seed(&sql, params), &direct(), &pk()).unwrap();

        assert!(normalized.sql_text.contains("x = {10} OR x = {9}"));
        assert!(normalized.sql_text.ends_with("x = {1} OR x = {0}"));
        assert_eq!(normalized.positional_parameters.len(), 11);
        assert_eq!(normalized.positional_parameters[10], json!(100));
    }

    #[test]
    fn test_bare_names_are_replaced_outside_quotes_and_qualifiers() {
        let sql = r#"SELECT "p0", t.p0 FROM t WHERE t.name = 'p0 @p0' AND t.id = p0"#;
        let normalized = normalize(seed(sql, json!({"p0": 1})), &direct(), &pk()).unwrap();

        assert_eq!(
            normalized.sql_text,
            r#"SELECT "p0", t.p0 FROM t WHERE t.name = 'p0 @p0' AND t.id = {0}"#
        );
    }

    #[test]
    fn test_escaped_quotes_inside_literals() {
        let sql = "SELECT id FROM t WHERE name = 'it''s @p0' AND id = @p0";
        let normalized = normalize(seed(sql, json!({"p0": 2})), &direct(), &pk()).unwrap();
        assert_eq!(
            normalized.sql_text,
            "SELECT id FROM t WHERE name = 'it''s @p0' AND id = {0}"
        );
    }

    #[test]
    fn test_unbound_parameter_is_rejected() {
        let err = normalize(
            seed("SELECT id FROM t WHERE id = @p1", json!({"p0": 1})),
            &direct(),
            &pk(),
        )
        .unwrap_err();
        assert!(matches!(err, RecursiveQueryError::MalformedSeedQuery(msg) if msg.contains("@p1")));
    }

    #[test]
    fn test_unreferenced_parameter_is_rejected() {
        let err = normalize(
            seed("SELECT id FROM t WHERE id = @p0", json!({"p0": 1, "p1": 2})),
            &direct(),
            &pk(),
        )
        .unwrap_err();
        assert!(matches!(err, RecursiveQueryError::MalformedSeedQuery(msg) if msg.contains("@p1")));
    }

    #[test]
    fn test_missing_select_is_rejected() {
        let err = normalize(seed("-- @p0='1'\n", json!({})), &direct(), &pk()).unwrap_err();
        assert!(matches!(err, RecursiveQueryError::MalformedSeedQuery(_)));

        // keyword match is case-sensitive at line start
        let err = normalize(seed("select id from t", json!({})), &direct(), &pk()).unwrap_err();
        assert!(matches!(err, RecursiveQueryError::MalformedSeedQuery(_)));
    }

    #[test]
    fn test_many_to_many_narrows_to_primary_key() {
        let sql = "SELECT \"a\".\"id\", \"a\".\"name\", \"a\".\"root_category_id\"\nFROM \"attribute\" AS \"a\"\nWHERE \"a\".\"id\" IN (@p0, @p1)";
        let normalized =
            normalize(seed(sql, json!({"p0": 1, "p1": 2})), &many_to_many(), &pk()).unwrap();

        assert_eq!(
            normalized.sql_text,
            r#"SELECT "a"."id" FROM "attribute" AS "a" WHERE "a"."id" IN ({0}, {1})"#
        );
    }

    #[test]
    fn test_narrowing_ignores_nested_from_and_aliases() {
        let sql = r#"SELECT (SELECT count(*) FROM "x") AS "total", "a"."name", "a"."ID" AS "key" FROM "attribute" AS "a""#;
        let normalized = normalize(seed(sql, json!({})), &many_to_many(), &pk()).unwrap();

        assert_eq!(
            normalized.sql_text,
            r#"SELECT "a"."ID" AS "key" FROM "attribute" AS "a""#
        );
    }

    #[test]
    fn test_narrowing_keeps_composite_key_in_key_order() {
        let sql = "SELECT l.tenant, l.label, l.code FROM l";
        let key = column_refs(&["code", "tenant"]);
        let normalized = normalize(seed(sql, json!({})), &many_to_many(), &key).unwrap();
        assert_eq!(normalized.sql_text, "SELECT l.code, l.tenant FROM l");
    }

    #[test]
    fn test_narrowing_without_key_column_is_rejected() {
        let sql = r#"SELECT "a"."name" FROM "attribute" AS "a""#;
        let err = normalize(seed(sql, json!({})), &many_to_many(), &pk()).unwrap_err();
        assert!(matches!(err, RecursiveQueryError::MalformedSeedQuery(msg) if msg.contains("\"id\"")));
    }
}
