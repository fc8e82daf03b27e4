//! Organization repository trait (port)
//!
//! Every method returns fully hydrated [`Organization`] read models ordered
//! by id.

use async_trait::async_trait;

use crate::domain::Organization;
use crate::error::DomainError;
use crate::geo::{BoundingBox, RadiusQuery};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Organization>, DomainError>;

    async fn find_by_building(&self, building_id: i32) -> Result<Vec<Organization>, DomainError>;

    /// Distinct organizations linked to `root_id` or any activity below it,
    /// expanded and fetched against one consistent view of the taxonomy.
    /// `None` when `root_id` does not exist.
    async fn find_by_activity_subtree(
        &self,
        root_id: i32,
    ) -> Result<Option<Vec<Organization>>, DomainError>;

    /// Case-insensitive substring match on the name
    async fn search_by_name(&self, query: &str) -> Result<Vec<Organization>, DomainError>;

    async fn find_within_radius(&self, query: &RadiusQuery) -> Result<Vec<Organization>, DomainError>;

    async fn find_within_bbox(&self, bbox: &BoundingBox) -> Result<Vec<Organization>, DomainError>;
}
