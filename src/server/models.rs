use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::CatalogError;
use crate::recursive_query::PlaceholderStyle;
use crate::seed_query::Filter;

/// Request body of `POST /attributes/hierarchy`
#[derive(Debug, Deserialize)]
pub struct AttributeHierarchyRequest {
    pub attribute_ids: Vec<i64>,
}

/// Request body of `POST /recursive-sql`
#[derive(Debug, Deserialize)]
pub struct RecursiveSqlRequest {
    pub entity: String,
    pub navigation: String,
    pub filter: Filter,
    /// Also render the statement with driver-native placeholders
    pub placeholder_style: Option<PlaceholderStyle>,
}

/// Compiled statement, not executed
#[derive(Debug, Serialize)]
pub struct RecursiveSqlResponse {
    pub entity: String,
    pub navigation: String,
    /// Statement with `{i}` placeholders
    pub sql: String,
    pub parameters: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_sql: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind, e.g. "INVALID_REQUEST"
    pub code: String,
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            code: code.to_string(),
            message: message.into(),
        }),
    )
}

impl From<CatalogError> for ApiError {
    fn from(error: CatalogError) -> Self {
        let (status, code) = match &error {
            CatalogError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            CatalogError::NoResultsForCategorySearch { .. } => {
                (StatusCode::NOT_FOUND, "NO_RESULTS_FOR_CATEGORY_SEARCH")
            }
            CatalogError::CategoryNotFound { .. } => (StatusCode::NOT_FOUND, "CATEGORY_NOT_FOUND"),
            CatalogError::AttributeIdsNotFound(_) => {
                (StatusCode::NOT_FOUND, "ATTRIBUTE_IDS_NOT_FOUND")
            }
            CatalogError::Query(e) if e.is_client_error() => {
                (StatusCode::BAD_REQUEST, "INVALID_RECURSIVE_QUERY")
            }
            CatalogError::Query(_) | CatalogError::Store(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        if status.is_server_error() {
            log::error!("Request failed: {}", error);
        } else {
            log::warn!("Request rejected: {}", error);
        }
        error_response(status, code, error.to_string())
    }
}
