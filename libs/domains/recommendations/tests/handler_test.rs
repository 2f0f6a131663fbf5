mod common;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{self, StatusCode},
};
use common::{FlakyIndex, Harness, HashEmbedder, MockEmbedder, ProductFixture, memory_index};
use domain_catalog::InMemoryCatalogRepository;
use domain_recommendations::{
    RecommendationService, SyncService, SyncSettings, admin_router, products_router,
};
use domain_vector::VectorError;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower::ServiceExt;

fn app(harness: &Harness) -> Router {
    Router::new()
        .nest(
            "/admin",
            admin_router(harness.sync.clone(), Arc::new(Mutex::new(()))),
        )
        .nest(
            "/products",
            products_router(harness.recommendations.clone()),
        )
}

async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = http::Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_sync_endpoint_runs_sync() {
    let harness = Harness::new(ProductFixture::products(5));

    let (status, body) = call(
        app(&harness),
        "POST",
        "/admin/sync",
        Some(json!({ "batch_size": 2 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Successfully synced 5 products");
    assert_eq!(body["total_products"], 5);
    assert_eq!(body["processed_products"], 5);
    assert_eq!(body["batch_size"], 2);
    assert_eq!(harness.index.point_count().await, 5);
}

#[tokio::test]
async fn test_partial_sync_reports_success() {
    let catalog = InMemoryCatalogRepository::with_products(ProductFixture::products(3));
    let index = memory_index();
    let sync = SyncService::new(
        Arc::new(catalog.clone()),
        Arc::new(FlakyIndex::new(index.clone(), &["p0002"])),
        Arc::new(HashEmbedder::new()),
        SyncSettings::default(),
    );
    let app = Router::new().nest("/admin", admin_router(sync, Arc::new(Mutex::new(()))));

    let (status, body) = call(app, "POST", "/admin/sync", Some(json!({ "batch_size": 2 }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "partial");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Partially synced: 2 success, 1 failed");
    assert_eq!(index.point_count().await, 2);
}

#[tokio::test]
async fn test_sync_endpoint_uses_default_batch_size() {
    let harness = Harness::new(ProductFixture::products(2));

    let (status, body) = call(app(&harness), "POST", "/admin/sync", Some(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["batch_size"], 100);
}

#[tokio::test]
async fn test_sync_endpoint_rejects_batch_size() {
    let harness = Harness::new(ProductFixture::products(2));

    let (status, body) = call(
        app(&harness),
        "POST",
        "/admin/sync",
        Some(json!({ "batch_size": 5000 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Batch size must be between 1 and 1000, got 5000");
    assert!(harness.catalog.sync_runs().await.is_empty());
}

#[tokio::test]
async fn test_sync_status_reports_last_run() {
    let harness = Harness::synced(ProductFixture::products(3)).await;

    let (status, body) = call(app(&harness), "GET", "/admin/sync/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["last_sync"]["status"], "success");
    assert_eq!(body["collection_info"]["points_count"], 3);
    assert_eq!(body["database_status"], true);
    assert_eq!(body["qdrant_status"], true);
}

#[tokio::test]
async fn test_sync_status_before_collection_exists() {
    let harness = Harness::new(ProductFixture::products(3));

    let (status, body) = call(app(&harness), "GET", "/admin/sync/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["last_sync"], Value::Null);
    assert!(body["collection_info"]["error"].is_string());
}

#[tokio::test]
async fn test_connection_endpoint() {
    let harness = Harness::new(Vec::new());

    let (status, body) = call(app(&harness), "POST", "/admin/sync/test-connection", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["postgres_status"], true);
    assert_eq!(body["postgres_message"], "PostgreSQL connection successful");
    assert_eq!(
        body["qdrant_message"],
        "Connected successfully. Collection not created yet."
    );
}

#[tokio::test]
async fn test_similar_endpoint() {
    let harness = Harness::synced(ProductFixture::products(6)).await;

    let (status, body) = call(
        app(&harness),
        "POST",
        "/products/similar",
        Some(json!({ "product_id": "p0002", "limit": 3 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["reference_product"], "p0002");
    assert_eq!(body["total_found"], 3);
    let hits = body["similar_products"].as_array().unwrap();
    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|h| h["product_id"] != "p0002"));
    assert!(hits[0]["type"].is_string());
}

#[tokio::test]
async fn test_similar_endpoint_accepts_numeric_id() {
    let harness = Harness::synced(vec![
        domain_catalog::ProductRecord::new("1", "Arc Lamp", "Lighting", "Lumen", "Floor", "Brass"),
        domain_catalog::ProductRecord::new("2", "Desk Lamp", "Lighting", "Lumen", "Desk", "Steel"),
    ])
    .await;

    let (status, body) = call(
        app(&harness),
        "POST",
        "/products/similar",
        Some(json!({ "product_id": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reference_product"], "1");
    assert_eq!(body["similar_products"][0]["product_id"], "2");
}

#[tokio::test]
async fn test_similar_endpoint_unknown_product_is_not_found() {
    let harness = Harness::synced(ProductFixture::products(3)).await;

    let (status, body) = call(
        app(&harness),
        "POST",
        "/products/similar",
        Some(json!({ "product_id": "nope" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Error retrieving similar products:")
    );
}

#[tokio::test]
async fn test_similar_endpoint_validates_limit() {
    let harness = Harness::synced(ProductFixture::products(3)).await;

    for limit in [0, 51] {
        let (status, body) = call(
            app(&harness),
            "POST",
            "/products/similar",
            Some(json!({ "product_id": "p0000", "limit": limit })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "limit {limit}");
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_similar_list_endpoint() {
    let harness = Harness::synced(ProductFixture::products(4)).await;

    let (status, body) = call(
        app(&harness),
        "POST",
        "/products/similar/list",
        Some(json!({ "product_ids": ["p0000", "p0001"], "limit": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reference_products"], json!(["p0000", "p0001"]));
    assert_eq!(body["total_found"], 6);
}

#[tokio::test]
async fn test_similar_list_endpoint_requires_ids() {
    let harness = Harness::synced(ProductFixture::products(2)).await;

    let (status, _) = call(
        app(&harness),
        "POST",
        "/products/similar/list",
        Some(json!({ "product_ids": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_endpoint() {
    let harness = Harness::synced(ProductFixture::products(6)).await;

    let (status, body) = call(
        app(&harness),
        "POST",
        "/products/search",
        Some(json!({ "query": "Lighting lamp", "limit": 2, "category_filter": "Lighting" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "Lighting lamp");
    assert_eq!(body["total_found"], 2);
    let hits = body["recommendations"].as_array().unwrap();
    assert!(hits.iter().all(|h| h["category"] == "Lighting"));
}

#[tokio::test]
async fn test_search_endpoint_rejects_empty_query() {
    let harness = Harness::synced(ProductFixture::products(2)).await;

    let (status, body) = call(
        app(&harness),
        "POST",
        "/products/search",
        Some(json!({ "query": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_search_endpoint_embedding_failure_is_server_error() {
    let harness = Harness::new(Vec::new());

    let mut embedder = MockEmbedder::new();
    embedder
        .expect_embed()
        .returning(|_| Err(VectorError::Embedding("quota exceeded".into())));
    let service = RecommendationService::new(Arc::new(memory_index()), Arc::new(embedder));

    let app = Router::new()
        .nest(
            "/admin",
            admin_router(harness.sync.clone(), Arc::new(Mutex::new(()))),
        )
        .nest("/products", products_router(service));

    let (status, body) = call(
        app,
        "POST",
        "/products/search",
        Some(json!({ "query": "lamp" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let harness = Harness::new(Vec::new());

    let response = app(&harness)
        .oneshot(
            http::Request::builder()
                .method("POST")
                .uri("/products/search")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
