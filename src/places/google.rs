//! Google Places Nearby Search adapter

use std::sync::Arc;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{info, instrument};

use super::PlaceFinder;
use crate::config::GoogleConfig;
use crate::http;
use crate::models::{Location, Place};
use crate::ratelimit::RateLimiter;
use crate::{Result, TripError};

const PROVIDER: &str = "google-places";

/// Google Places API client
pub struct GooglePlaceFinder {
    client: ClientWithMiddleware,
    limiter: Arc<RateLimiter>,
    api_key: String,
    base_url: String,
}

/// Nearby Search response; `results` is absent on errors
#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: String,
    geometry: Geometry,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

impl GooglePlaceFinder {
    /// Create a new client; fails if no API key is configured
    pub fn new(
        client: ClientWithMiddleware,
        config: &GoogleConfig,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TripError::config("Google API key is required for place search"))?;
        Ok(Self {
            client,
            limiter,
            api_key,
            base_url: config.places_url.trim_end_matches('/').to_string(),
        })
    }

    fn nearby_url(&self, location: Location, radius_meters: u32, place_type: &str) -> String {
        format!(
            "{}/nearbysearch/json?location={},{}&radius={}&type={}&key={}",
            self.base_url,
            location.lat,
            location.lng,
            radius_meters,
            urlencoding::encode(place_type),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl PlaceFinder for GooglePlaceFinder {
    #[instrument(skip(self))]
    async fn find_nearby(
        &self,
        location: Location,
        radius_meters: u32,
        place_type: &str,
    ) -> Result<Vec<Place>> {
        let url = self.nearby_url(location, radius_meters, place_type);
        let response: NearbySearchResponse =
            http::get_json(&self.client, &self.limiter, PROVIDER, &url).await?;
        let places = parse_nearby_response(response, place_type)?;
        info!("Found {} places from Google Places", places.len());
        Ok(places)
    }
}

fn parse_nearby_response(response: NearbySearchResponse, place_type: &str) -> Result<Vec<Place>> {
    match response.status.as_str() {
        "OK" => Ok(response
            .results
            .into_iter()
            .map(|result| {
                Place::new(result.geometry.location, result.name, place_type)
                    .with_tags(result.types)
            })
            .collect()),
        "ZERO_RESULTS" => Ok(Vec::new()),
        status => Err(TripError::provider_unavailable(
            PROVIDER,
            format!("{status}: {}", response.error_message.unwrap_or_default()),
        )),
    }
}
