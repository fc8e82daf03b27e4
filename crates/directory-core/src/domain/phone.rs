//! Phone entity

use serde::{Deserialize, Serialize};

/// Phone number owned by exactly one organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub id: i32,
    pub number: String,
}
