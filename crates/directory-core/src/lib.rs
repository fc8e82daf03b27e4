//! # Directory Core
//!
//! Domain entities, repository traits, taxonomy and geo logic for the
//! organization directory.

pub mod domain;
pub mod error;
pub mod geo;
pub mod repositories;
pub mod services;
pub mod store;
pub mod taxonomy;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
pub use geo::{BoundingBox, GeoPoint, GeoQuery, RadiusQuery};
pub use services::DirectoryService;
pub use store::MemoryDirectory;
pub use taxonomy::ActivityForest;
