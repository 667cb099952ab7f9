use thiserror::Error;

use crate::recursive_query::RecursiveQueryError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Parameter {index} cannot be bound: {value} (only null, bool, number and string values are supported)")]
    UnsupportedParameter { index: usize, value: String },
    #[error("Database connection lock poisoned")]
    LockPoisoned,
    #[error(transparent)]
    Query(#[from] RecursiveQueryError),
}
