//! # Directory Core - Domain Module
//!
//! Domain entities and read models for the directory.

pub mod activity;
pub mod building;
pub mod organization;
pub mod phone;

// Re-export all entities
pub use activity::{Activity, ActivityTree, NewActivity, MAX_ACTIVITY_DEPTH};
pub use building::{Building, NewBuilding};
pub use organization::{NewOrganization, Organization};
pub use phone::Phone;
