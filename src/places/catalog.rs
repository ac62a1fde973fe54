//! Curated place catalogue loaded from a JSON file

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use super::PlaceFinder;
use crate::Result;
use crate::models::{Location, Place};

/// In-memory place list searched by category and great-circle radius
#[derive(Debug, Clone, Default)]
pub struct CatalogPlaceFinder {
    places: Vec<Place>,
}

impl CatalogPlaceFinder {
    #[must_use]
    pub fn new(places: Vec<Place>) -> Self {
        Self { places }
    }

    /// Load a JSON array of places
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let places: Vec<Place> = serde_json::from_str(&content)?;
        info!(
            "Loaded {} catalogue places from {}",
            places.len(),
            path.as_ref().display()
        );
        Ok(Self::new(places))
    }

    /// Places matching the category within the radius, closest first
    #[must_use]
    pub fn places_within_radius(
        &self,
        center: &Location,
        radius_meters: u32,
        place_type: &str,
    ) -> Vec<Place> {
        let mut results: Vec<(f64, &Place)> = self
            .places
            .iter()
            .filter(|place| place.matches_category(place_type))
            .map(|place| (center.distance_meters(&place.location), place))
            .filter(|(distance, _)| *distance <= f64::from(radius_meters))
            .collect();

        results.sort_by(|a, b| a.0.total_cmp(&b.0));
        results
            .into_iter()
            .map(|(_, place)| {
                let mut place = place.clone();
                place.category = place_type.to_string();
                place
            })
            .collect()
    }
}

#[async_trait]
impl PlaceFinder for CatalogPlaceFinder {
    async fn find_nearby(
        &self,
        location: Location,
        radius_meters: u32,
        place_type: &str,
    ) -> Result<Vec<Place>> {
        let places = self.places_within_radius(&location, radius_meters, place_type);
        debug!("Catalogue matched {} places", places.len());
        Ok(places)
    }
}
