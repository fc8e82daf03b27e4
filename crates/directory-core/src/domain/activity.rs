// ============================================================================
// Directory Core - Activity Entity
// File: crates/directory-core/src/domain/activity.rs
// Description: Node of the activity taxonomy (adjacency list)
// ============================================================================

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Deepest level an activity may live at. A root is level 1.
pub const MAX_ACTIVITY_DEPTH: usize = 3;

/// Activity entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
}

impl Activity {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Activity with its children attached, used for the taxonomy listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityTree {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub children: Vec<ActivityTree>,
}

/// Write payload for a new activity
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewActivity {
    #[validate(length(min = 1, max = 255, message = "Activity name must be between 1 and 255 characters"))]
    pub name: String,
    pub parent_id: Option<i32>,
}

impl NewActivity {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_id: None,
        }
    }

    pub fn child(name: impl Into<String>, parent_id: i32) -> Self {
        Self {
            name: name.into(),
            parent_id: Some(parent_id),
        }
    }
}
