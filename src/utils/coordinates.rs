use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};

/// Inclusive latitude/longitude box. No wraparound at ±180°.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.lat_min <= latitude
            && latitude <= self.lat_max
            && self.lon_min <= longitude
            && longitude <= self.lon_max
    }

    pub fn is_empty(&self) -> bool {
        self.lat_min > self.lat_max || self.lon_min > self.lon_max
    }
}

/// Validate a coordinate pair against the global bounds
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Latitude {} is outside [-90, 90]",
            latitude
        )));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Longitude {} is outside [-180, 180]",
            longitude
        )));
    }

    Ok(())
}

/// Well-known ocean regions used when a query names a place instead of a box.
pub fn named_region(name: &str) -> Option<BoundingBox> {
    let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");
    match normalized.as_str() {
        "bay_of_bengal" => Some(BoundingBox::new(5.0, 22.0, 80.0, 95.0)),
        "arabian_sea" => Some(BoundingBox::new(8.0, 25.0, 50.0, 75.0)),
        "indian_ocean" => Some(BoundingBox::new(-30.0, 30.0, 30.0, 120.0)),
        _ => None,
    }
}

/// Great-circle distance between two points in kilometres (Haversine)
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_is_inclusive() {
        let bbox = BoundingBox::new(5.0, 22.0, 80.0, 95.0);
        assert!(bbox.contains(5.0, 80.0));
        assert!(bbox.contains(22.0, 95.0));
        assert!(!bbox.contains(4.999, 85.0));
        assert!(!bbox.contains(10.0, 95.001));
    }

    #[test]
    fn test_inverted_box_is_empty() {
        assert!(BoundingBox::new(10.0, 0.0, 0.0, 1.0).is_empty());
        assert!(!BoundingBox::new(0.0, 0.0, 0.0, 0.0).is_empty());
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(validate_coordinates(15.0, 88.0).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert!(validate_coordinates(90.5, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.5).is_err());
    }

    #[test]
    fn test_named_regions() {
        assert_eq!(
            named_region("Bay of Bengal"),
            Some(BoundingBox::new(5.0, 22.0, 80.0, 95.0))
        );
        assert!(named_region("arabian-sea").is_some());
        assert_eq!(named_region("atlantis"), None);
    }

    #[test]
    fn test_haversine_distance() {
        // Chennai to Colombo
        let distance = haversine_distance(13.0827, 80.2707, 6.9271, 79.8612);
        assert!((distance - 685.0).abs() < 15.0);
    }
}
