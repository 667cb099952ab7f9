use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::catalog::{CatalogError, CatalogService, SearchCategoriesQuery, SearchCategoryDto};
use crate::store::{AttributeRecord, CategoryRecord};

use super::{
    models::{
        error_response, ApiError, AttributeHierarchyRequest, RecursiveSqlRequest,
        RecursiveSqlResponse,
    },
    AppState,
};

/// Simple health check endpoint
pub async fn health_check(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let cache = app_state.service.engine().cache_metrics();
    Json(serde_json::json!({
        "service": "catalogtree",
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "query_cache": {
            "size": cache.size,
            "hits": cache.hits,
            "misses": cache.misses,
            "hit_rate": cache.hit_rate(),
        }
    }))
}

/// Run a blocking catalog call off the async runtime
async fn run_blocking<T, F>(service: &CatalogService, call: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&CatalogService) -> Result<T, CatalogError> + Send + 'static,
{
    let service = service.clone();
    match tokio::task::spawn_blocking(move || call(&service)).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            log::error!("Catalog task failed: {}", e);
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Catalog task failed",
            ))
        }
    }
}

pub async fn search_categories_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<SearchCategoriesQuery>,
) -> Result<Json<Vec<SearchCategoryDto>>, ApiError> {
    log::debug!(
        "Category search in root category {} for article {}",
        query.root_category_id,
        query.article_number
    );
    let forest = run_blocking(&app_state.service, move |s| s.search_categories(&query)).await?;
    Ok(Json(forest))
}

pub async fn category_subtree_handler(
    State(app_state): State<Arc<AppState>>,
    Path((root_category_id, category_number)): Path<(i64, i64)>,
) -> Result<Json<Vec<CategoryRecord>>, ApiError> {
    let subtree = run_blocking(&app_state.service, move |s| {
        s.category_subtree(root_category_id, category_number)
    })
    .await?;
    Ok(Json(subtree))
}

pub async fn attribute_hierarchy_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<AttributeHierarchyRequest>,
) -> Result<Json<Vec<AttributeRecord>>, ApiError> {
    let attributes = run_blocking(&app_state.service, move |s| {
        s.attribute_hierarchy(&payload.attribute_ids)
    })
    .await?;
    Ok(Json(attributes))
}

/// Compile a recursive query without executing it
pub async fn recursive_sql_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<RecursiveSqlRequest>,
) -> Result<Json<RecursiveSqlResponse>, ApiError> {
    let engine = app_state.service.engine();
    let compiled = engine
        .compile_recursive_query(&payload.entity, &payload.filter, &payload.navigation)
        .map_err(|e| ApiError::from(CatalogError::from(e)))?;

    let native_sql = match payload.placeholder_style {
        Some(style) => Some(
            compiled
                .to_native(style)
                .map_err(|e| ApiError::from(CatalogError::from(e)))?,
        ),
        None => None,
    };

    Ok(Json(RecursiveSqlResponse {
        entity: payload.entity,
        navigation: payload.navigation,
        sql: compiled.sql_text,
        parameters: compiled.parameters,
        native_sql,
    }))
}
