//! Identifier quoting for generated SQL.
//!
//! All generated SQL quotes identifiers with ANSI double quotes, which both
//! SQLite and PostgreSQL accept. Quoting is idempotent: an identifier that is
//! already wrapped in double quotes is returned unchanged, so a value can be
//! passed through several builders without turning into `""id""`.

/// Quote an identifier (table, column or CTE name).
///
/// Embedded double quotes are escaped by doubling them.
///
/// # Examples
/// ```
/// use catalogtree::utils::identifiers::quote_identifier;
/// assert_eq!(quote_identifier("parent_id"), "\"parent_id\"");
/// assert_eq!(quote_identifier("\"parent_id\""), "\"parent_id\"");
/// assert_eq!(quote_identifier("odd\"name"), "\"odd\"\"name\"");
/// ```
pub fn quote_identifier(name: &str) -> String {
    let trimmed = name.trim();
    if is_quoted(trimmed) {
        return trimmed.to_string();
    }
    format!("\"{}\"", trimmed.replace('"', "\"\""))
}

/// Remove one level of double quotes, undoing `quote_identifier`.
pub fn unquote_identifier(name: &str) -> String {
    let trimmed = name.trim();
    if is_quoted(trimmed) {
        trimmed[1..trimmed.len() - 1].replace("\"\"", "\"")
    } else {
        trimmed.to_string()
    }
}

/// Format a qualified column reference: "table"."column"
///
/// # Examples
/// ```
/// use catalogtree::utils::identifiers::qualified_column;
/// assert_eq!(qualified_column("category", "id"), "\"category\".\"id\"");
/// ```
pub fn qualified_column(table: &str, column: &str) -> String {
    format!("{}.{}", quote_identifier(table), quote_identifier(column))
}

// A quoted identifier starts and ends with `"` and every inner quote is doubled.
fn is_quoted(s: &str) -> bool {
    if s.len() < 2 || !s.starts_with('"') || !s.ends_with('"') {
        return false;
    }
    let inner = &s[1..s.len() - 1];
    inner.replace("\"\"", "").chars().all(|c| c != '"')
}
