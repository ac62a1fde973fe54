//! Combines several place sources into one

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::warn;

use super::PlaceFinder;
use crate::models::{Location, Place};
use crate::{Result, TripError};

/// Concatenates results of every source, in source order.
///
/// A source that cannot answer is skipped; the search only fails when every
/// source fails, with the error of the first one. Any other error, such as
/// a rejected query, fails the search even if other sources answered.
pub struct MergedPlaceFinder {
    sources: Vec<Arc<dyn PlaceFinder>>,
}

impl MergedPlaceFinder {
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn PlaceFinder>>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl PlaceFinder for MergedPlaceFinder {
    async fn find_nearby(
        &self,
        location: Location,
        radius_meters: u32,
        place_type: &str,
    ) -> Result<Vec<Place>> {
        let results = join_all(
            self.sources
                .iter()
                .map(|source| source.find_nearby(location, radius_meters, place_type)),
        )
        .await;

        let mut places = Vec::new();
        let mut first_error = None;
        let mut succeeded = false;
        for result in results {
            match result {
                Ok(found) => {
                    succeeded = true;
                    places.extend(found);
                }
                Err(e) if e.is_provider_failure() => {
                    warn!("Place source failed: {}", e);
                    first_error.get_or_insert(e);
                }
                Err(e) => return Err(e),
            }
        }

        match (succeeded, first_error) {
            (false, Some(e)) => Err(e),
            (false, None) => Err(TripError::config("no place source configured")),
            (true, _) => Ok(places),
        }
    }
}
