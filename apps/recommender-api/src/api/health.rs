//! Unversioned service endpoints: `/`, `/health`.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain_recommendations::models::CollectionInfo;
use serde::Serialize;
use serde_json::{Value, json};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub collection_info: CollectionInfo,
    pub model_name: String,
}

/// Healthy while Qdrant answers; a missing collection is reported, not fatal.
pub async fn health(State(state): State<AppState>) -> Response {
    if !state.sync.ping_index().await {
        tracing::warn!("Health check failed: Qdrant unreachable");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unhealthy", "error": "Qdrant unreachable" })),
        )
            .into_response();
    }

    Json(HealthResponse {
        status: "healthy",
        collection_info: CollectionInfo::from(state.sync.collection_stats().await),
        model_name: state.recommendations.model_name(),
    })
    .into_response()
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Product Recommender API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/docs",
        "endpoints": {
            "health": "/health",
            "metrics": "/metrics",
            "sync": "/api/v1/admin/sync",
            "sync_status": "/api/v1/admin/sync/status",
            "test_connection": "/api/v1/admin/sync/test-connection",
            "similar_products": "/api/v1/products/similar",
            "similar_products_list": "/api/v1/products/similar/list",
            "semantic_search": "/api/v1/products/search"
        }
    }))
}
