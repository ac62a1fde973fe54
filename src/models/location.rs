//! Location model for geographic coordinates

use serde::{Deserialize, Serialize};

/// Geographic point in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }

    /// Round coordinates for cache key generation
    #[must_use]
    pub fn rounded_coordinates(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lat = (self.lat * multiplier).round() / multiplier;
        let lng = (self.lng * multiplier).round() / multiplier;
        (lat, lng)
    }

    /// Key fragment identifying this location to roughly 10 m
    #[must_use]
    pub fn cache_key(&self) -> String {
        let (lat, lng) = self.rounded_coordinates(4);
        format!("{lat:.4}:{lng:.4}")
    }

    /// Great-circle distance in meters
    #[must_use]
    pub fn distance_meters(&self, other: &Location) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.lat,
                longitude: self.lng,
            },
            haversine::Location {
                latitude: other.lat,
                longitude: other.lng,
            },
            haversine::Units::Kilometers,
        ) * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_cache_key() {
        let location = Location::new(46.818_234, 8.227_456);
        assert_eq!(location.cache_key(), "46.8182:8.2275");
    }

    #[test]
    fn test_location_rounded_coordinates() {
        let location = Location::new(46.818_234, 8.227_456);
        let (lat, lng) = location.rounded_coordinates(2);
        assert_eq!(lat, 46.82);
        assert_eq!(lng, 8.23);
    }

    #[test]
    fn test_distance_meters() {
        let lausanne = Location::new(46.5197, 6.6323);
        let geneva = Location::new(46.2044, 6.1432);
        let meters = lausanne.distance_meters(&geneva);
        assert!(meters > 50_000.0 && meters < 54_000.0, "got {meters}");
        assert_eq!(lausanne.distance_meters(&lausanne), 0.0);
    }

    #[test]
    fn test_location_serializes_lat_lng() {
        let json = serde_json::to_value(Location::new(1.5, 2.5)).unwrap();
        assert_eq!(json, serde_json::json!({"lat": 1.5, "lng": 2.5}));
    }
}
