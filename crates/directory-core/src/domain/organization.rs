// ============================================================================
// Directory Core - Organization Read Model
// File: crates/directory-core/src/domain/organization.rs
// Description: Organization hydrated with building, activities and phones
// ============================================================================

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Activity, Building, Phone};

/// Organization read model.
///
/// Every value handed out by a repository carries its building, all linked
/// activities and all phones. Activities and phones are ordered by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i32,
    pub name: String,
    pub building_id: i32,
    pub building: Building,
    pub activities: Vec<Activity>,
    pub phones: Vec<Phone>,
}

/// Write payload for a new organization
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewOrganization {
    #[validate(length(min = 1, max = 255, message = "Organization name must be between 1 and 255 characters"))]
    pub name: String,
    pub building_id: i32,
    #[serde(default)]
    pub activity_ids: Vec<i32>,
    #[serde(default)]
    pub phones: Vec<String>,
}

impl NewOrganization {
    pub fn new(name: impl Into<String>, building_id: i32) -> Self {
        Self {
            name: name.into(),
            building_id,
            activity_ids: Vec::new(),
            phones: Vec::new(),
        }
    }

    pub fn with_activities(mut self, activity_ids: impl IntoIterator<Item = i32>) -> Self {
        self.activity_ids.extend(activity_ids);
        self
    }

    pub fn with_phones<S: Into<String>>(mut self, phones: impl IntoIterator<Item = S>) -> Self {
        self.phones.extend(phones.into_iter().map(Into::into));
        self
    }
}
