use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use directory_core::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::OrganizationNotFound(_)
            | DomainError::ActivityNotFound(_)
            | DomainError::BuildingNotFound(_) => ApiError::NotFound(err.to_string()),
            DomainError::InvalidGeoParams(_) | DomainError::ValidationError(_) => {
                ApiError::BadRequest(err.to_string())
            }
            DomainError::InvalidDepth { .. } | DomainError::ActivityNameAlreadyExists(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            DomainError::DatabaseError(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(errors.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::Forbidden(msg) => {
                tracing::warn!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, "Forbidden", msg)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "NotFound", msg)
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "BadRequest", msg)
            }
            ApiError::UnprocessableEntity(msg) => {
                tracing::warn!("Unprocessable entity: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, "UnprocessableEntity", msg)
            }
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                // driver messages stay in the log
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DatabaseError",
                    "Database unavailable".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalError", msg)
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_status_mapping() {
        let cases = [
            (DomainError::OrganizationNotFound(1), StatusCode::NOT_FOUND),
            (DomainError::ActivityNotFound(1), StatusCode::NOT_FOUND),
            (
                DomainError::InvalidGeoParams("missing radius".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::InvalidDepth {
                    parent_id: 3,
                    max_depth: 3,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DomainError::DatabaseError("timeout".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
