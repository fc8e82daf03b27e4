use std::sync::Arc;

use axum::{extract::State, Json};
use directory_core::{Building, DirectoryService, Organization};
use tracing::info;

use crate::dto::GeoSearchQuery;
use crate::utils::{ApiError, ApiPath, ApiQuery};

/// GET /api/v1/buildings/
pub async fn list_buildings(
    State(directory): State<Arc<DirectoryService>>,
) -> Result<Json<Vec<Building>>, ApiError> {
    Ok(Json(directory.list_buildings().await?))
}

/// GET /api/v1/buildings/{building_id}/organizations
pub async fn organizations_in_building(
    State(directory): State<Arc<DirectoryService>>,
    ApiPath(building_id): ApiPath<i32>,
) -> Result<Json<Vec<Organization>>, ApiError> {
    let organizations = directory.organizations_by_building(building_id).await?;
    Ok(Json(organizations))
}

/// GET /api/v1/buildings/search/geo
pub async fn search_geo(
    State(directory): State<Arc<DirectoryService>>,
    ApiQuery(query): ApiQuery<GeoSearchQuery>,
) -> Result<Json<Vec<Building>>, ApiError> {
    let geo = query.into_geo_query()?;
    info!("Building geo search: {:?}", geo);

    let buildings = directory.search_buildings_geo(&geo).await?;
    Ok(Json(buildings))
}
