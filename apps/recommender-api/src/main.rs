use axum::middleware;
use axum_helpers::{create_app, create_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_catalog::{RetryConfig, connect_with_retry};
use eyre::WrapErr;
use migration::{Migrator, MigratorTrait};
use observability::{init_metrics, metrics_middleware};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env().wrap_err("Failed to load configuration")?;

    init_tracing(&config.environment);
    init_metrics();

    if config.uses_dev_admin_token() {
        warn!("ADMIN_BEARER_TOKEN not set, using the development token");
    }

    info!("Connecting to PostgreSQL");
    let db = connect_with_retry(&config.database, RetryConfig::default())
        .await
        .wrap_err("PostgreSQL connection failed")?;

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .wrap_err("Failed to run migrations")?;
        info!("Migrations applied");
    }

    let state = AppState::from_config(&config, db.clone())?;
    info!(
        collection = %config.qdrant.collection_name,
        model = %state.recommendations.model_name(),
        "Vector index and embedding clients ready"
    );

    let app = create_router::<openapi::ApiDoc>(api::routes(&state))
        .merge(api::service_router(state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(CorsLayer::permissive());

    info!("Starting recommender API on {}", config.server.address());
    create_app(app, &config.server)
        .await
        .wrap_err("Server error")?;

    info!("Shutting down: closing database connections");
    match db.close().await {
        Ok(()) => info!("PostgreSQL connection closed successfully"),
        Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
    }

    info!("Recommender API shutdown complete");
    Ok(())
}
