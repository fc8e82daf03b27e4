// ============================================================================
// Directory Core - Directory Service
// File: crates/directory-core/src/services/directory_service.rs
// Description: Read operations the request layer calls
// ============================================================================

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{ActivityTree, Building, Organization};
use crate::error::DomainError;
use crate::geo::GeoQuery;
use crate::repositories::{ActivityRepository, BuildingRepository, OrganizationRepository};
use crate::taxonomy::ActivityForest;

/// Entry point for every directory lookup
#[derive(Clone)]
pub struct DirectoryService {
    activities: Arc<dyn ActivityRepository>,
    buildings: Arc<dyn BuildingRepository>,
    organizations: Arc<dyn OrganizationRepository>,
}

impl DirectoryService {
    pub fn new(
        activities: Arc<dyn ActivityRepository>,
        buildings: Arc<dyn BuildingRepository>,
        organizations: Arc<dyn OrganizationRepository>,
    ) -> Self {
        Self {
            activities,
            buildings,
            organizations,
        }
    }

    pub async fn organization_by_id(&self, id: i32) -> Result<Organization, DomainError> {
        self.organizations
            .find_by_id(id)
            .await?
            .ok_or(DomainError::OrganizationNotFound(id))
    }

    /// Organizations housed in a building. An unknown building yields an
    /// empty list.
    pub async fn organizations_by_building(
        &self,
        building_id: i32,
    ) -> Result<Vec<Organization>, DomainError> {
        self.organizations.find_by_building(building_id).await
    }

    /// Organizations linked to `activity_id` or to any activity below it
    pub async fn organizations_by_activity(
        &self,
        activity_id: i32,
    ) -> Result<Vec<Organization>, DomainError> {
        let organizations = self
            .organizations
            .find_by_activity_subtree(activity_id)
            .await?
            .ok_or_else(|| {
                warn!("Activity {} not found", activity_id);
                DomainError::ActivityNotFound(activity_id)
            })?;

        debug!(
            "Activity {} subtree matches {} organizations",
            activity_id,
            organizations.len()
        );
        Ok(organizations)
    }

    /// `activity_id` and every descendant id
    pub async fn activity_subtree(&self, activity_id: i32) -> Result<Vec<i32>, DomainError> {
        let ids = self.activities.subtree_ids(activity_id).await?;
        if ids.is_empty() {
            return Err(DomainError::ActivityNotFound(activity_id));
        }
        Ok(ids)
    }

    pub async fn search_organizations_by_name(
        &self,
        query: &str,
    ) -> Result<Vec<Organization>, DomainError> {
        self.organizations.search_by_name(query).await
    }

    pub async fn search_organizations_geo(
        &self,
        query: &GeoQuery,
    ) -> Result<Vec<Organization>, DomainError> {
        match query {
            GeoQuery::Radius(radius) => self.organizations.find_within_radius(radius).await,
            GeoQuery::BoundingBox(bbox) => self.organizations.find_within_bbox(bbox).await,
        }
    }

    pub async fn list_buildings(&self) -> Result<Vec<Building>, DomainError> {
        self.buildings.list().await
    }

    pub async fn search_buildings_geo(&self, query: &GeoQuery) -> Result<Vec<Building>, DomainError> {
        match query {
            GeoQuery::Radius(radius) => self.buildings.find_within_radius(radius).await,
            GeoQuery::BoundingBox(bbox) => self.buildings.find_within_bbox(bbox).await,
        }
    }

    /// The whole taxonomy as nested trees
    pub async fn activity_tree(&self) -> Result<Vec<ActivityTree>, DomainError> {
        let activities = self.activities.list().await?;
        Ok(ActivityForest::new(activities).trees())
    }

    pub async fn check_activity_depth(&self, parent_id: Option<i32>) -> Result<bool, DomainError> {
        self.activities.depth_is_valid(parent_id).await
    }
}
