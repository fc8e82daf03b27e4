//! Building repository trait (port)

use async_trait::async_trait;

use crate::domain::Building;
use crate::error::DomainError;
use crate::geo::{BoundingBox, RadiusQuery};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BuildingRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Building>, DomainError>;
    async fn find_within_radius(&self, query: &RadiusQuery) -> Result<Vec<Building>, DomainError>;
    async fn find_within_bbox(&self, bbox: &BoundingBox) -> Result<Vec<Building>, DomainError>;
}
