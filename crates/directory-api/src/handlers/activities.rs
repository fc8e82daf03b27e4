use std::sync::Arc;

use axum::{extract::State, Json};
use directory_core::{ActivityTree, DirectoryService, Organization};
use tracing::info;

use crate::utils::{ApiError, ApiPath};

/// GET /api/v1/activities/
pub async fn activity_tree(
    State(directory): State<Arc<DirectoryService>>,
) -> Result<Json<Vec<ActivityTree>>, ApiError> {
    Ok(Json(directory.activity_tree().await?))
}

/// GET /api/v1/activities/{activity_id}/organizations
///
/// Includes organizations linked to any descendant activity.
pub async fn organizations_by_activity(
    State(directory): State<Arc<DirectoryService>>,
    ApiPath(activity_id): ApiPath<i32>,
) -> Result<Json<Vec<Organization>>, ApiError> {
    info!("Organizations by activity subtree of {}", activity_id);

    let organizations = directory.organizations_by_activity(activity_id).await?;
    Ok(Json(organizations))
}
