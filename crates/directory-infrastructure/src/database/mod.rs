//! Database module (PostgreSQL adapters)

pub mod connection;
pub mod postgres;

pub use connection::{create_pool, ping, run_migrations};
pub use postgres::{PgActivityRepository, PgBuildingRepository, PgOrganizationRepository};
