use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use catalogtree::{
    config::ServerConfig,
    server::{router, AppState},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::{demo_store, service};

fn app() -> Router {
    router(AppState {
        service: service(demo_store()),
        config: ServerConfig::default(),
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_category_search() {
    let (status, body) = send(
        app(),
        get("/categories/search?root_category_id=1&article_number=A-1000&search_term=running"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["category_number"], 100);
    let running = &body[0]["children"][0]["children"][0];
    assert_eq!(running["label"], "Running Shoes");
    assert_eq!(running["is_selected"], true);
    assert_eq!(running["parent_category_number"], 110);
}

#[tokio::test]
async fn test_category_search_without_criterion() {
    let (status, body) = send(
        app(),
        get("/categories/search?root_category_id=1&article_number=A-1000"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_category_subtree() {
    let (status, body) = send(app(), get("/categories/1/120/subtree")).await;
    assert_eq!(status, StatusCode::OK);
    let numbers: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["category_number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![120, 121]);

    let (status, body) = send(app(), get("/categories/1/999/subtree")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "CATEGORY_NOT_FOUND");
}

#[tokio::test]
async fn test_attribute_hierarchy() {
    let (status, body) = send(app(), post("/attributes/hierarchy", json!({"attribute_ids": [2]}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = send(app(), post("/attributes/hierarchy", json!({"attribute_ids": [2, 77]}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Attribute ids not found: 77");
}

#[tokio::test]
async fn test_recursive_sql() {
    let (status, body) = send(
        app(),
        post(
            "/recursive-sql",
            json!({
                "entity": "category",
                "navigation": "parent",
                "filter": {"op": "eq", "column": "id", "value": 3},
                "placeholder_style": "dollar_numbered"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["sql"].as_str().unwrap().contains("WITH RECURSIVE \"recursiveCte\""));
    assert!(body["native_sql"].as_str().unwrap().contains("= $1"));
    assert_eq!(body["parameters"], json!([3]));
}

#[tokio::test]
async fn test_recursive_sql_rejects_non_recursive_navigation() {
    let (status, body) = send(
        app(),
        post(
            "/recursive-sql",
            json!({
                "entity": "category",
                "navigation": "root_category",
                "filter": {"op": "eq", "column": "id", "value": 3}
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_RECURSIVE_QUERY");
}
