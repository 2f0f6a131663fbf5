use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Default filter for development when `RUST_LOG` is not set.
const DEV_FILTER: &str =
    "debug,domain_recommendations=trace,sqlx=warn,sea_orm=info,hyper=info,h2=info,tower=info";

/// Default filter for production when `RUST_LOG` is not set.
const PROD_FILTER: &str = "info,sqlx=warn,sea_orm=warn,hyper=warn,h2=warn";

/// Install color-eyre for report rendering in the binary.
///
/// Safe to call more than once; later calls are ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize the global tracing subscriber.
///
/// - Production: flattened JSON events without module targets.
/// - Development: pretty, human-readable output with targets.
///
/// Both variants carry an [`tracing_error::ErrorLayer`] so `eyre` reports
/// include the active span trace. `RUST_LOG` overrides the default filter.
///
/// Calling this twice is harmless: the second registration fails quietly,
/// which is what happens under `cargo test`.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if environment.is_production() {
            EnvFilter::new(PROD_FILTER)
        } else {
            EnvFilter::new(DEV_FILTER)
        }
    });

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(environment = ?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}
