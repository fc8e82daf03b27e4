//! Geo query engine: great-circle distance, radius and bounding-box filters.
//!
//! The store implementations push these predicates down into their queries;
//! the functions here are the reference semantics they must agree with.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Mean Earth radius used by every distance computation, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres (spherical law of cosines).
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    // coincident points
    if lat1 == lat2 && lon1 == lon2 {
        return 0.0;
    }

    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let delta_lon = lon2.to_radians() - lon1.to_radians();

    let cosine = lat1.cos() * lat2.cos() * delta_lon.cos() + lat1.sin() * lat2.sin();

    // Rounding can push the argument just outside acos' domain
    EARTH_RADIUS_KM * cosine.clamp(-1.0, 1.0).acos()
}

/// A validated latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        check_latitude("lat", latitude)?;
        check_longitude("lon", longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        distance_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Point + radius search. The boundary is inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusQuery {
    pub center: GeoPoint,
    pub radius_km: f64,
}

impl RadiusQuery {
    pub fn new(center: GeoPoint, radius_km: f64) -> Result<Self, DomainError> {
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(DomainError::InvalidGeoParams(format!(
                "radius must be a non-negative number of kilometres, got {}",
                radius_km
            )));
        }
        Ok(Self { center, radius_km })
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.center.distance_km(point) <= self.radius_km
    }
}

/// Axis-aligned latitude/longitude rectangle, inclusive on all four bounds.
///
/// Boxes crossing the antimeridian are not supported: `min_lon` must not
/// exceed `max_lon`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self, DomainError> {
        check_latitude("min_lat", min_lat)?;
        check_latitude("max_lat", max_lat)?;
        check_longitude("min_lon", min_lon)?;
        check_longitude("max_lon", max_lon)?;

        if min_lat > max_lat {
            return Err(DomainError::InvalidGeoParams(format!(
                "min_lat ({}) is greater than max_lat ({})",
                min_lat, max_lat
            )));
        }
        if min_lon > max_lon {
            return Err(DomainError::InvalidGeoParams(format!(
                "min_lon ({}) is greater than max_lon ({})",
                min_lon, max_lon
            )));
        }

        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude)
            && (self.min_lon..=self.max_lon).contains(&point.longitude)
    }
}

/// Raw, optional geo search parameters as they arrive from a caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct GeoParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius: Option<f64>,
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
    pub min_lon: Option<f64>,
    pub max_lon: Option<f64>,
}

/// A resolved geo search: exactly one of the two modes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoQuery {
    Radius(RadiusQuery),
    BoundingBox(BoundingBox),
}

impl TryFrom<GeoParams> for GeoQuery {
    type Error = DomainError;

    fn try_from(params: GeoParams) -> Result<Self, Self::Error> {
        let radius = match (params.lat, params.lon, params.radius) {
            (Some(lat), Some(lon), Some(radius)) => Some((lat, lon, radius)),
            _ => None,
        };
        let bbox = match (params.min_lat, params.max_lat, params.min_lon, params.max_lon) {
            (Some(min_lat), Some(max_lat), Some(min_lon), Some(max_lon)) => {
                Some((min_lat, max_lat, min_lon, max_lon))
            }
            _ => None,
        };

        match (radius, bbox) {
            (Some((lat, lon, radius)), None) => {
                let center = GeoPoint::new(lat, lon)?;
                Ok(GeoQuery::Radius(RadiusQuery::new(center, radius)?))
            }
            (None, Some((min_lat, max_lat, min_lon, max_lon))) => Ok(GeoQuery::BoundingBox(
                BoundingBox::new(min_lat, max_lat, min_lon, max_lon)?,
            )),
            (Some(_), Some(_)) => Err(DomainError::InvalidGeoParams(
                "Provide either (lat, lon, radius) or (min_lat, max_lat, min_lon, max_lon), not both"
                    .to_string(),
            )),
            (None, None) => Err(DomainError::InvalidGeoParams(
                "Provide either (lat, lon, radius) or (min_lat, max_lat, min_lon, max_lon)"
                    .to_string(),
            )),
        }
    }
}

fn check_latitude(field: &str, value: f64) -> Result<(), DomainError> {
    if !(-90.0..=90.0).contains(&value) {
        return Err(DomainError::InvalidGeoParams(format!(
            "{} must be between -90 and 90, got {}",
            field, value
        )));
    }
    Ok(())
}

fn check_longitude(field: &str, value: f64) -> Result<(), DomainError> {
    if !(-180.0..=180.0).contains(&value) {
        return Err(DomainError::InvalidGeoParams(format!(
            "{} must be between -180 and 180, got {}",
            field, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOSCOW: (f64, f64) = (55.7558, 37.6173);

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance_km(MOSCOW.0, MOSCOW.1, MOSCOW.0, MOSCOW.1), 0.0);
        assert_eq!(distance_km(-33.86, 151.21, -33.86, 151.21), 0.0);
        assert_eq!(distance_km(45.123456, -73.654321, 45.123456, -73.654321), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let there = distance_km(MOSCOW.0, MOSCOW.1, 59.9343, 30.3351);
        let back = distance_km(59.9343, 30.3351, MOSCOW.0, MOSCOW.1);
        assert_eq!(there, back);
        // Moscow to Saint Petersburg is roughly 634 km
        assert!((there - 634.0).abs() < 5.0, "got {}", there);
    }

    #[test]
    fn test_antipodal_points_do_not_produce_nan() {
        let d = distance_km(0.0, 0.0, 0.0, 180.0);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_radius_hit_and_miss() {
        let center = GeoPoint::new(MOSCOW.0, MOSCOW.1).unwrap();
        let query = RadiusQuery::new(center, 1.0).unwrap();

        // ~55 m north
        let near = GeoPoint::new(MOSCOW.0 + 0.0005, MOSCOW.1).unwrap();
        // ~5.5 km north
        let far = GeoPoint::new(MOSCOW.0 + 0.05, MOSCOW.1).unwrap();

        assert!(query.contains(&near));
        assert!(!query.contains(&far));
    }

    #[test]
    fn test_radius_zero_contains_center() {
        let center = GeoPoint::new(10.0, 10.0).unwrap();
        let query = RadiusQuery::new(center, 0.0).unwrap();
        assert!(query.contains(&center));
    }

    #[test]
    fn test_negative_radius_rejected() {
        let center = GeoPoint::new(0.0, 0.0).unwrap();
        assert!(RadiusQuery::new(center, -1.0).is_err());
        assert!(RadiusQuery::new(center, f64::NAN).is_err());
    }

    #[test]
    fn test_bbox_is_inclusive() {
        let bbox = BoundingBox::new(55.0, 56.0, 37.0, 38.0).unwrap();

        for (lat, lon) in [(55.0, 37.0), (56.0, 38.0), (55.0, 38.0), (56.0, 37.0)] {
            assert!(bbox.contains(&GeoPoint::new(lat, lon).unwrap()), "{} {}", lat, lon);
        }
        assert!(!bbox.contains(&GeoPoint::new(56.000001, 37.5).unwrap()));
        assert!(!bbox.contains(&GeoPoint::new(55.5, 36.999999).unwrap()));
    }

    #[test]
    fn test_inverted_bbox_rejected() {
        assert!(BoundingBox::new(56.0, 55.0, 37.0, 38.0).is_err());
        assert!(BoundingBox::new(55.0, 56.0, 170.0, -170.0).is_err());
    }

    #[test]
    fn test_geo_params_radius_mode() {
        let params = GeoParams {
            lat: Some(MOSCOW.0),
            lon: Some(MOSCOW.1),
            radius: Some(1.0),
            ..Default::default()
        };
        assert!(matches!(GeoQuery::try_from(params), Ok(GeoQuery::Radius(_))));
    }

    #[test]
    fn test_geo_params_bbox_mode_with_partial_radius() {
        let params = GeoParams {
            lat: Some(MOSCOW.0),
            min_lat: Some(55.0),
            max_lat: Some(56.0),
            min_lon: Some(37.0),
            max_lon: Some(38.0),
            ..Default::default()
        };
        assert!(matches!(GeoQuery::try_from(params), Ok(GeoQuery::BoundingBox(_))));
    }

    #[test]
    fn test_geo_params_incomplete_rejected() {
        let params = GeoParams {
            lat: Some(MOSCOW.0),
            lon: Some(MOSCOW.1),
            min_lat: Some(55.0),
            ..Default::default()
        };
        assert!(matches!(
            GeoQuery::try_from(params),
            Err(DomainError::InvalidGeoParams(_))
        ));
        assert!(GeoQuery::try_from(GeoParams::default()).is_err());
    }

    #[test]
    fn test_geo_params_both_modes_rejected() {
        let params = GeoParams {
            lat: Some(0.0),
            lon: Some(0.0),
            radius: Some(1.0),
            min_lat: Some(-1.0),
            max_lat: Some(1.0),
            min_lon: Some(-1.0),
            max_lon: Some(1.0),
        };
        assert!(GeoQuery::try_from(params).is_err());
    }

    #[test]
    fn test_geo_params_latitude_out_of_range() {
        let params = GeoParams {
            lat: Some(91.0),
            lon: Some(0.0),
            radius: Some(1.0),
            ..Default::default()
        };
        assert!(matches!(
            GeoQuery::try_from(params),
            Err(DomainError::InvalidGeoParams(_))
        ));
    }
}
