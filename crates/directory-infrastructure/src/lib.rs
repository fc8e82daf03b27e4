//! # Directory Infrastructure
//!
//! PostgreSQL implementations (adapters) of the directory repositories,
//! plus schema bootstrap and demo seed data.

pub mod database;
pub mod seed;

pub use database::{
    create_pool, run_migrations, PgActivityRepository, PgBuildingRepository,
    PgOrganizationRepository,
};
pub use seed::seed_if_empty;
