//! Repository traits (ports)

pub mod activity_repository;
pub mod building_repository;
pub mod organization_repository;

pub use activity_repository::ActivityRepository;
pub use building_repository::BuildingRepository;
pub use organization_repository::OrganizationRepository;

#[cfg(test)]
pub use activity_repository::MockActivityRepository;
#[cfg(test)]
pub use building_repository::MockBuildingRepository;
#[cfg(test)]
pub use organization_repository::MockOrganizationRepository;
