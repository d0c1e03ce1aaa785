//! Shared-secret authentication middleware.

use std::sync::Arc;

use axum::{extract::State, http::Request, middleware::Next, response::Response};
use tracing::warn;

use crate::http::errors::ApiError;
use crate::state::ApiState;

/// Header carrying the shared API token.
pub(crate) const HEADER_API_TOKEN: &str = "x-api-token";

pub(crate) async fn require_api_token(
    State(state): State<Arc<ApiState>>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = req
        .headers()
        .get(HEADER_API_TOKEN)
        .and_then(|value| value.to_str().ok())
        .map(str::trim);

    match provided {
        Some(token) if token == state.api_token => Ok(next.run(req).await),
        Some(_) => {
            warn!(
                path = %req.uri().path(),
                "request used an invalid API token"
            );
            Err(ApiError::unauthorized("invalid API token"))
        }
        None => Err(ApiError::unauthorized("missing API token header")),
    }
}
