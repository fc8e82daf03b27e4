//! PostgreSQL repository implementations

pub mod activity_repo_impl;
pub mod building_repo_impl;
pub mod organization_repo_impl;
pub(crate) mod read_tx;
mod rows;

pub use activity_repo_impl::PgActivityRepository;
pub use building_repo_impl::PgBuildingRepository;
pub use organization_repo_impl::PgOrganizationRepository;
