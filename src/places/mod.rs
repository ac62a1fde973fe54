//! Nearby place discovery
//!
//! The [`PlaceFinder`] trait is what the solution factory consumes; the
//! submodules provide the Google Places adapter, a local catalogue and a
//! combinator merging several sources.

use async_trait::async_trait;

use crate::Result;
use crate::models::{Location, Place};

pub mod catalog;
pub mod google;
pub mod merged;

pub use catalog::CatalogPlaceFinder;
pub use google::GooglePlaceFinder;
pub use merged::MergedPlaceFinder;

#[async_trait]
pub trait PlaceFinder: Send + Sync {
    /// Places of `place_type` within `radius_meters` of `location`.
    ///
    /// An empty list means no match; transport failures are reported as
    /// [`crate::TripError::ProviderUnavailable`].
    async fn find_nearby(
        &self,
        location: Location,
        radius_meters: u32,
        place_type: &str,
    ) -> Result<Vec<Place>>;
}
