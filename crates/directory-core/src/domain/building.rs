// ============================================================================
// Directory Core - Building Entity
// File: crates/directory-core/src/domain/building.rs
// ============================================================================

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::geo::GeoPoint;

/// Building entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: i32,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Building {
    pub fn location(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Write payload for a new building
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewBuilding {
    #[validate(length(min = 1, message = "Address must not be empty"))]
    pub address: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,
}

impl NewBuilding {
    pub fn new(
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, validator::ValidationErrors> {
        let building = Self {
            address: address.into().trim().to_string(),
            latitude,
            longitude,
        };

        building.validate()?;
        Ok(building)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_building() {
        let building = NewBuilding::new("Lenina 1", 55.7558, 37.6173);
        assert!(building.is_ok());
    }

    #[test]
    fn test_latitude_out_of_range() {
        assert!(NewBuilding::new("Nowhere", 91.0, 0.0).is_err());
        assert!(NewBuilding::new("Nowhere", 0.0, -180.5).is_err());
    }

    #[test]
    fn test_boundary_coordinates_accepted() {
        assert!(NewBuilding::new("North Pole", 90.0, 180.0).is_ok());
        assert!(NewBuilding::new("South Pole", -90.0, -180.0).is_ok());
    }
}
