use crate::security::ApiKeyValidator;
use crate::utils::error::ApiError;
use axum::{extract::Request, middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

/// Security middleware - reject requests without a valid API key
pub async fn security_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    let validator = request
        .extensions()
        .get::<Arc<ApiKeyValidator>>()
        .ok_or_else(|| ApiError::InternalError("API key validator not configured".to_string()))?
        .clone();

    validator.validate(request.headers())?;

    debug!("{} {} authorized", request.method(), request.uri().path());

    // Continue to next middleware/handler
    Ok(next.run(request).await)
}
