//! SQLite-backed execution boundary.
//!
//! One connection behind a mutex. Every call is synchronous; async callers
//! run them on `tokio::task::spawn_blocking`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde_json::Value;

use super::errors::StoreError;
use super::records::{AttributeRecord, CategoryRecord};
use super::schema::CATALOG_DDL;
use crate::recursive_query::{CompiledRecursiveQuery, PlaceholderStyle};

pub struct CatalogStore {
    conn: Mutex<Connection>,
}

impl CatalogStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        log::info!("Opened catalog database at {}", path.as_ref().display());
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        CatalogStore {
            conn: Mutex::new(conn),
        }
    }

    pub(super) fn connection(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Create the catalog tables if they do not exist yet
    pub fn initialize_schema(&self) -> Result<(), StoreError> {
        self.connection()?.execute_batch(CATALOG_DDL)?;
        log::debug!("Catalog schema initialized");
        Ok(())
    }

    /// Execute a compiled recursive statement and map every row.
    pub fn query_compiled<T, F>(
        &self,
        query: &CompiledRecursiveQuery,
        mut map_row: F,
    ) -> Result<Vec<T>, StoreError>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let sql = query.to_native(PlaceholderStyle::QuestionNumbered)?;
        let values = query
            .parameters
            .iter()
            .enumerate()
            .map(|(i, v)| to_sql_value(i, v))
            .collect::<Result<Vec<_>, _>>()?;

        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| map_row(row))?;
        let result = rows.collect::<Result<Vec<_>, _>>()?;
        log::debug!("Recursive query returned {} rows", result.len());
        Ok(result)
    }

    pub fn query_categories(
        &self,
        query: &CompiledRecursiveQuery,
    ) -> Result<Vec<CategoryRecord>, StoreError> {
        self.query_compiled(query, CategoryRecord::from_row)
    }

    pub fn query_attributes(
        &self,
        query: &CompiledRecursiveQuery,
    ) -> Result<Vec<AttributeRecord>, StoreError> {
        self.query_compiled(query, AttributeRecord::from_row)
    }

    /// Ids of the categories of one root category that an article is mapped to
    pub fn mapped_category_ids(
        &self,
        article_number: &str,
        root_category_id: i64,
    ) -> Result<Vec<i64>, StoreError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT c.id FROM category c
             JOIN article_category ac ON ac.category_id = c.id
             JOIN article a ON a.id = ac.article_id
             WHERE a.article_number = ?1 AND c.root_category_id = ?2
             ORDER BY c.id",
        )?;
        let ids = stmt
            .query_map(params![article_number, root_category_id], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;
        Ok(ids)
    }
}

fn to_sql_value(index: usize, value: &Value) -> Result<SqlValue, StoreError> {
    let unsupported = || StoreError::UnsupportedParameter {
        index,
        value: value.to_string(),
    };
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(b) => Ok(SqlValue::Integer(i64::from(*b))),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(SqlValue::Integer(i)),
            (None, Some(f)) => Ok(SqlValue::Real(f)),
            _ => Err(unsupported()),
        },
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(unsupported()),
    }
}
