//! OpenAPI documentation configuration

use domain_recommendations::{AdminApiDoc, ProductsApiDoc};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

/// Combined OpenAPI documentation for the recommender API
#[derive(OpenApi)]
#[openapi(
    components(schemas(axum_helpers::ErrorResponse)),
    info(
        title = "Product Recommender API",
        version = "0.1.0",
        description = "Catalog to vector index sync, similar products and semantic search"
    ),
    servers(
        (url = "/api/v1", description = "API base path")
    ),
    nest(
        (path = "/admin", api = AdminApiDoc),
        (path = "/products", api = ProductsApiDoc)
    ),
    modifiers(&BearerSecurity)
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by the admin paths
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
