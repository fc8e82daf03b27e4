//! Domain errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Organization not found: {0}")]
    OrganizationNotFound(i32),

    #[error("Activity not found: {0}")]
    ActivityNotFound(i32),

    #[error("Building not found: {0}")]
    BuildingNotFound(i32),

    #[error("Activity nesting under parent {parent_id} would exceed {max_depth} levels")]
    InvalidDepth { parent_id: i32, max_depth: usize },

    #[error("Activity name already exists: {0}")]
    ActivityNameAlreadyExists(String),

    #[error("Invalid geo parameters: {0}")]
    InvalidGeoParams(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}
