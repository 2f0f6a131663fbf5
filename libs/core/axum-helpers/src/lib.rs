//! # Axum Helpers
//!
//! Shared HTTP plumbing for the recommender API.
//!
//! ## Modules
//!
//! - **[`errors`]**: Structured error responses with error codes
//! - **[`extractors`]**: `ValidatedJson` request extractor
//! - **[`auth`]**: Static bearer-token guard for admin routes
//! - **[`server`]**: Router assembly, serving, graceful shutdown

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod server;

pub use auth::{BearerToken, bearer_auth_middleware};
pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::ValidatedJson;
pub use server::{create_app, create_router, shutdown_signal};
