//! Itinerary resolution between two locations

use async_trait::async_trait;

use crate::Result;
use crate::models::{Itinerary, Location};

pub mod cached;
pub mod google;

pub use crate::models::TimeAnchor;
pub use cached::CachedItineraryResolver;
pub use google::GoogleItineraryResolver;

#[async_trait]
pub trait ItineraryResolver: Send + Sync {
    /// Best itinerary from `origin` to `destination` for the given anchor.
    ///
    /// `Ok(None)` means no route exists; transport failures are errors.
    async fn resolve(
        &self,
        origin: Location,
        destination: Location,
        anchor: TimeAnchor,
    ) -> Result<Option<Itinerary>>;
}
