use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
};
use tokio::sync::Mutex;
use utoipa::OpenApi;

use crate::error::{RecommenderError, RecommenderResult};
use crate::models::{
    CollectionInfo, ConnectionTestResponse, QueryReference, RecommendationHit,
    SemanticQueryRequest, SemanticQueryResponse, SimilarProductsListRequest,
    SimilarProductsListResponse, SimilarProductsRequest, SimilarProductsResponse, SyncRequest,
    SyncResponse, SyncStatusResponse,
};
use crate::recommendations::RecommendationService;
use crate::sync::SyncService;

pub const ADMIN_TAG: &str = "admin";
pub const PRODUCTS_TAG: &str = "products";

/// OpenAPI documentation for the admin sync endpoints
#[derive(OpenApi)]
#[openapi(
    paths(trigger_sync, sync_status, test_connection),
    components(
        schemas(SyncRequest, SyncResponse, SyncStatusResponse, CollectionInfo, ConnectionTestResponse),
        responses(BadRequestValidationResponse, UnauthorizedResponse, InternalServerErrorResponse)
    ),
    tags((name = ADMIN_TAG, description = "Catalog to vector index sync"))
)]
pub struct AdminApiDoc;

/// OpenAPI documentation for the recommendation endpoints
#[derive(OpenApi)]
#[openapi(
    paths(similar_products, similar_products_list, semantic_search),
    components(
        schemas(
            SimilarProductsRequest,
            SimilarProductsListRequest,
            SemanticQueryRequest,
            SimilarProductsResponse,
            SimilarProductsListResponse,
            SemanticQueryResponse,
            RecommendationHit
        ),
        responses(BadRequestValidationResponse, NotFoundResponse, InternalServerErrorResponse)
    ),
    tags((name = PRODUCTS_TAG, description = "Similar products and semantic search"))
)]
pub struct ProductsApiDoc;

#[derive(Clone)]
struct AdminState {
    sync: SyncService,
    /// One HTTP-triggered run at a time per process
    sync_lock: Arc<Mutex<()>>,
}

/// Admin routes: `/sync`, `/sync/status`, `/sync/test-connection`.
///
/// Authentication is layered on by the caller.
pub fn admin_router(sync: SyncService, sync_lock: Arc<Mutex<()>>) -> Router {
    Router::new()
        .route("/sync", post(trigger_sync))
        .route("/sync/status", get(sync_status))
        .route("/sync/test-connection", post(test_connection))
        .with_state(AdminState { sync, sync_lock })
}

/// Product routes: `/similar`, `/similar/list`, `/search`
pub fn products_router(service: RecommendationService) -> Router {
    Router::new()
        .route("/similar", post(similar_products))
        .route("/similar/list", post(similar_products_list))
        .route("/search", post(semantic_search))
        .with_state(Arc::new(service))
}

/// Sync unindexed products into the vector index
#[utoipa::path(
    post,
    path = "/sync",
    tag = ADMIN_TAG,
    request_body = SyncRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Run finished (check `status` for partial failure)", body = SyncResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn trigger_sync(
    State(state): State<AdminState>,
    ValidatedJson(request): ValidatedJson<SyncRequest>,
) -> RecommenderResult<Json<SyncResponse>> {
    let batch_size = request
        .batch_size
        .unwrap_or(state.sync.settings().default_batch_size);

    let _guard = state.sync_lock.lock().await;
    let run = state.sync.run_sync(batch_size, request.force_reindex).await?;

    Ok(Json(SyncResponse::from(run)))
}

/// Last run, collection stats and store reachability
#[utoipa::path(
    get,
    path = "/sync/status",
    tag = ADMIN_TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sync status", body = SyncStatusResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn sync_status(State(state): State<AdminState>) -> Json<SyncStatusResponse> {
    Json(state.sync.sync_status().await)
}

/// Check PostgreSQL and Qdrant connectivity
#[utoipa::path(
    post,
    path = "/sync/test-connection",
    tag = ADMIN_TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Connection report", body = ConnectionTestResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn test_connection(State(state): State<AdminState>) -> Json<ConnectionTestResponse> {
    Json(state.sync.test_connections().await)
}

/// Products similar to one reference product
#[utoipa::path(
    post,
    path = "/similar",
    tag = PRODUCTS_TAG,
    request_body = SimilarProductsRequest,
    responses(
        (status = 200, description = "Similar products", body = SimilarProductsResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn similar_products(
    State(service): State<Arc<RecommendationService>>,
    ValidatedJson(request): ValidatedJson<SimilarProductsRequest>,
) -> RecommenderResult<Json<SimilarProductsResponse>> {
    let list = service
        .find_similar_by_id(
            &request.product_id,
            request.limit,
            request.category_filter.as_deref(),
            request.brand_filter.as_deref(),
        )
        .await;

    if !list.success {
        return Err(RecommenderError::NoResults(list.message));
    }

    let reference_product = match list.reference {
        Some(QueryReference::Product(id)) => Some(id),
        _ => None,
    };

    Ok(Json(SimilarProductsResponse {
        success: list.success,
        message: list.message,
        reference_product,
        total_found: list.total_found,
        similar_products: list.recommendations,
    }))
}

/// Products similar to each of several reference products, concatenated
#[utoipa::path(
    post,
    path = "/similar/list",
    tag = PRODUCTS_TAG,
    request_body = SimilarProductsListRequest,
    responses(
        (status = 200, description = "Similar products per reference, in request order", body = SimilarProductsListResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn similar_products_list(
    State(service): State<Arc<RecommendationService>>,
    ValidatedJson(request): ValidatedJson<SimilarProductsListRequest>,
) -> RecommenderResult<Json<SimilarProductsListResponse>> {
    let list = service
        .find_similar_by_id_list(
            &request.product_ids,
            request.limit,
            request.category_filter.as_deref(),
            request.brand_filter.as_deref(),
        )
        .await;

    if !list.success {
        return Err(RecommenderError::NoResults(list.message));
    }

    Ok(Json(SimilarProductsListResponse {
        success: list.success,
        message: list.message,
        reference_products: request.product_ids,
        total_found: list.total_found,
        similar_products: list.recommendations,
    }))
}

/// Semantic search over product embeddings
#[utoipa::path(
    post,
    path = "/search",
    tag = PRODUCTS_TAG,
    request_body = SemanticQueryRequest,
    responses(
        (status = 200, description = "Recommendations", body = SemanticQueryResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn semantic_search(
    State(service): State<Arc<RecommendationService>>,
    ValidatedJson(request): ValidatedJson<SemanticQueryRequest>,
) -> RecommenderResult<Json<SemanticQueryResponse>> {
    let list = service
        .find_similar_by_text(
            &request.query,
            request.limit,
            request.category_filter.as_deref(),
            request.brand_filter.as_deref(),
        )
        .await;

    if !list.success {
        return Err(RecommenderError::QueryFailed(list.message));
    }

    Ok(Json(SemanticQueryResponse {
        success: list.success,
        message: list.message,
        query: request.query,
        total_found: list.total_found,
        recommendations: list.recommendations,
    }))
}
