//! API routes module

pub mod health;

use axum::{Router, middleware, routing::get};
use axum_helpers::bearer_auth_middleware;
use domain_recommendations::{admin_router, products_router};
use observability::metrics_handler;

use crate::state::AppState;

/// Versioned routes, without the `/api/v1` prefix added by `create_router`.
///
/// Everything under `/admin` requires the admin bearer token.
pub fn routes(state: &AppState) -> Router {
    let admin = admin_router(state.sync.clone(), state.sync_lock.clone()).layer(
        middleware::from_fn_with_state(state.admin_token.clone(), bearer_auth_middleware),
    );

    Router::new()
        .nest("/admin", admin)
        .nest("/products", products_router(state.recommendations.clone()))
}

/// `/`, `/health` and `/metrics`
pub fn service_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::ApiDoc;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{self, StatusCode},
    };
    use axum_helpers::{BearerToken, create_router};
    use domain_catalog::{InMemoryCatalogRepository, ProductRecord};
    use domain_recommendations::{RecommendationService, SyncService, SyncSettings};
    use domain_vector::{EmbeddingProvider, InMemoryVectorRepository, VectorConfig, VectorResult};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    const TOKEN: &str = "test-admin-token";

    /// Letter-frequency vectors; enough for routing tests
    struct LetterEmbedder;

    #[async_trait]
    impl EmbeddingProvider for LetterEmbedder {
        fn model_name(&self) -> String {
            "letters".to_string()
        }

        fn dimension(&self) -> u32 {
            26
        }

        async fn embed(&self, documents: &[String]) -> VectorResult<Vec<Vec<f32>>> {
            Ok(documents
                .iter()
                .map(|d| {
                    let mut v = vec![0.0; 26];
                    for c in d.to_ascii_lowercase().bytes().filter(u8::is_ascii_lowercase) {
                        v[(c - b'a') as usize] += 1.0;
                    }
                    v
                })
                .collect())
        }
    }

    fn app() -> Router {
        let catalog = InMemoryCatalogRepository::with_products([
            ProductRecord::new("1", "Arc Lamp", "Lighting", "Lumen", "Floor", "Brass arc"),
            ProductRecord::new("2", "Desk Lamp", "Lighting", "Lumen", "Desk", "Steel arm"),
            ProductRecord::new("3", "Oak Chair", "Seating", "Oakline", "Chair", "Solid oak"),
        ]);
        let index = Arc::new(InMemoryVectorRepository::new("products", VectorConfig::new(26)));
        let embedder = Arc::new(LetterEmbedder);

        let state = AppState::new(
            SyncService::new(
                Arc::new(catalog),
                index.clone(),
                embedder.clone(),
                SyncSettings::default(),
            ),
            RecommendationService::new(index, embedder),
            BearerToken::new(TOKEN),
        );

        create_router::<ApiDoc>(routes(&state)).merge(service_router(state))
    }

    async fn send(app: Router, request: http::Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn sync_request(token: Option<&str>) -> http::Request<Body> {
        let mut builder = http::Request::builder()
            .method("POST")
            .uri("/api/v1/admin/sync")
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::from(json!({}).to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_admin_routes_require_token() {
        let (status, body) = send(app(), sync_request(None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHORIZED");

        let (status, body) = send(app(), sync_request(Some("wrong-token"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid authentication credentials");
    }

    #[tokio::test]
    async fn test_admin_sync_with_token() {
        let (status, body) = send(app(), sync_request(Some(TOKEN))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Successfully synced 3 products");
    }

    #[tokio::test]
    async fn test_products_routes_are_public() {
        let request = http::Request::builder()
            .method("POST")
            .uri("/api/v1/products/search")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "query": "" }).to_string()))
            .unwrap();

        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_reports_model_and_missing_collection() {
        let request = http::Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["model_name"], "letters");
        assert!(body["collection_info"]["error"].is_string());
    }

    #[tokio::test]
    async fn test_index_lists_endpoints() {
        let request = http::Request::builder().uri("/").body(Body::empty()).unwrap();

        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["docs"], "/docs");
        assert_eq!(body["endpoints"]["sync"], "/api/v1/admin/sync");
    }

    #[tokio::test]
    async fn test_metrics_endpoint_renders_without_recorder() {
        let request = http::Request::builder().uri("/metrics").body(Body::empty()).unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let request = http::Request::builder().uri("/nope").body(Body::empty()).unwrap();

        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }
}
