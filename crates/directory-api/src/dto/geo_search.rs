//! Geo search query string: either `lat, lon, radius` or
//! `min_lat, max_lat, min_lon, max_lon`.

use directory_core::geo::{GeoParams, GeoQuery};
use serde::Deserialize;
use validator::Validate;

use crate::utils::error::ApiError;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct GeoSearchQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "lat must be between -90 and 90"))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "lon must be between -180 and 180"))]
    pub lon: Option<f64>,

    /// Kilometres
    #[validate(range(min = 0.0, message = "radius must not be negative"))]
    pub radius: Option<f64>,

    #[validate(range(min = -90.0, max = 90.0, message = "min_lat must be between -90 and 90"))]
    pub min_lat: Option<f64>,

    #[validate(range(min = -90.0, max = 90.0, message = "max_lat must be between -90 and 90"))]
    pub max_lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "min_lon must be between -180 and 180"))]
    pub min_lon: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "max_lon must be between -180 and 180"))]
    pub max_lon: Option<f64>,
}

impl GeoSearchQuery {
    /// Validates ranges, then resolves exactly one search mode
    pub fn into_geo_query(self) -> Result<GeoQuery, ApiError> {
        self.validate()?;

        let params = GeoParams {
            lat: self.lat,
            lon: self.lon,
            radius: self.radius,
            min_lat: self.min_lat,
            max_lat: self.max_lat,
            min_lon: self.min_lon,
            max_lon: self.max_lon,
        };

        Ok(GeoQuery::try_from(params)?)
    }
}
