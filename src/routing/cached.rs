use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::RngExt;
use tracing::{instrument, warn};

use super::{ItineraryResolver, TimeAnchor};
use crate::Result;
use crate::cache::PersistentCache;
use crate::models::{Itinerary, Location};

/// Wraps a resolver with the persistent cache.
///
/// Only found routes are stored. Cache failures are logged and bypassed.
pub struct CachedItineraryResolver {
    inner: Arc<dyn ItineraryResolver>,
    cache: Arc<PersistentCache>,
    ttl: Duration,
}

impl CachedItineraryResolver {
    #[must_use]
    pub fn new(inner: Arc<dyn ItineraryResolver>, cache: Arc<PersistentCache>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    fn key(origin: Location, destination: Location, anchor: TimeAnchor) -> String {
        let anchor = match anchor {
            TimeAnchor::DepartAt(at) => format!("dep{}", at.timestamp()),
            TimeAnchor::ArriveBy(at) => format!("arr{}", at.timestamp()),
        };
        format!("route-{}-{}-{}", origin.cache_key(), destination.cache_key(), anchor)
    }
}

#[async_trait]
impl ItineraryResolver for CachedItineraryResolver {
    #[instrument(skip(self))]
    async fn resolve(
        &self,
        origin: Location,
        destination: Location,
        anchor: TimeAnchor,
    ) -> Result<Option<Itinerary>> {
        let key = Self::key(origin, destination, anchor);

        match self.cache.get::<Itinerary>(&key).await {
            Ok(Some(cached)) => return Ok(Some(cached)),
            Ok(None) => {}
            Err(e) => warn!("Route cache lookup failed: {}", e),
        }

        let itinerary = self.inner.resolve(origin, destination, anchor).await?;

        if let Some(found) = &itinerary {
            let jitter: f64 = rand::rng().random_range(0.9..1.1);
            let ttl = self.ttl.mul_f64(jitter);
            if let Err(e) = self.cache.put(&key, found.clone(), ttl).await {
                warn!("Route cache write failed: {}", e);
            }
        }
        Ok(itinerary)
    }
}
