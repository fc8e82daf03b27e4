use std::sync::Arc;

use axum::{extract::State, Json};
use directory_core::{DirectoryService, Organization};
use tracing::info;

use crate::dto::{GeoSearchQuery, NameSearchQuery};
use crate::utils::{ApiError, ApiPath, ApiQuery};

/// GET /api/v1/organizations/{organization_id}
pub async fn get_organization(
    State(directory): State<Arc<DirectoryService>>,
    ApiPath(organization_id): ApiPath<i32>,
) -> Result<Json<Organization>, ApiError> {
    let organization = directory.organization_by_id(organization_id).await?;
    Ok(Json(organization))
}

/// GET /api/v1/organizations/search/name?q=
pub async fn search_by_name(
    State(directory): State<Arc<DirectoryService>>,
    ApiQuery(query): ApiQuery<NameSearchQuery>,
) -> Result<Json<Vec<Organization>>, ApiError> {
    info!("Organization name search: {:?}", query.q);

    let organizations = directory.search_organizations_by_name(&query.q).await?;
    Ok(Json(organizations))
}

/// GET /api/v1/organizations/search/geo
pub async fn search_geo(
    State(directory): State<Arc<DirectoryService>>,
    ApiQuery(query): ApiQuery<GeoSearchQuery>,
) -> Result<Json<Vec<Organization>>, ApiError> {
    let geo = query.into_geo_query()?;
    info!("Organization geo search: {:?}", geo);

    let organizations = directory.search_organizations_geo(&geo).await?;
    Ok(Json(organizations))
}
