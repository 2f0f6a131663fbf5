//! Static bearer-token guard.
//!
//! Admin routes are protected by a single shared token rather than user
//! sessions:
//!
//! ```ignore
//! let admin = Router::new()
//!     .route("/sync", post(trigger_sync))
//!     .layer(middleware::from_fn_with_state(
//!         BearerToken::new("secret"),
//!         bearer_auth_middleware,
//!     ));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::errors::AppError;

/// Characters of a rejected token that may appear in logs
const LOGGED_TOKEN_PREFIX: usize = 10;

#[derive(Clone)]
pub struct BearerToken(Arc<str>);

impl BearerToken {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    fn matches(&self, presented: &str) -> bool {
        let expected = self.0.as_bytes();
        let presented = presented.as_bytes();
        expected.len() == presented.len()
            && expected
                .iter()
                .zip(presented)
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

fn token_prefix(token: &str) -> String {
    token.chars().take(LOGGED_TOKEN_PREFIX).collect()
}

/// Rejects requests whose `Authorization: Bearer` token differs from the
/// configured one with 401.
pub async fn bearer_auth_middleware(
    State(expected): State<BearerToken>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    match presented {
        Some(token) if expected.matches(token) => Ok(next.run(req).await),
        Some(token) => {
            tracing::warn!(token_prefix = %token_prefix(token), "Invalid admin token");
            Err(AppError::Unauthorized(
                "Invalid authentication credentials".to_string(),
            ))
        }
        None => {
            tracing::warn!("Missing admin bearer token");
            Err(AppError::Unauthorized(
                "Invalid authentication credentials".to_string(),
            ))
        }
    }
}
