//! Search query model

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{Interval, Location, duration};
use crate::{Result, TripError};

/// Number of solutions returned when the caller does not say
pub const DEFAULT_MAX_RESULTS: usize = 10;

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

/// Search criteria consumed by the solution pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Where the round trip starts and ends
    pub location: Location,
    /// Time available for the whole trip
    pub interval: Interval,
    /// Search radius in meters
    pub radius: u32,
    /// Type of place to search for
    #[serde(alias = "type")]
    pub place_type: String,
    /// Maximum non-walking travel time over both itineraries
    #[serde(with = "duration::seconds")]
    pub max_travel: Duration,
    /// Maximum walking time over both itineraries
    #[serde(with = "duration::seconds")]
    pub max_walk: Duration,
    /// Accepted weather condition ids, empty means any weather
    #[serde(default, alias = "weather_ids")]
    pub accepted_weather_codes: Vec<u16>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Language for provider texts such as forecast descriptions
    #[serde(default)]
    pub language: Option<String>,
}

impl Query {
    /// Check the query before it enters the pipeline.
    ///
    /// Nothing is repaired: the first offending field is reported.
    pub fn validate(&self) -> Result<()> {
        if self.interval.start() > self.interval.end() {
            return Err(TripError::validation("interval start is after its end"));
        }
        if self.radius == 0 {
            return Err(TripError::validation("radius must be greater than zero"));
        }
        if self.place_type.trim().is_empty() {
            return Err(TripError::validation("place type cannot be empty"));
        }
        if self.max_results < 1 {
            return Err(TripError::validation("max results must be at least 1"));
        }
        if self.max_travel < Duration::zero() || self.max_walk < Duration::zero() {
            return Err(TripError::validation("duration budgets cannot be negative"));
        }
        if !self.location.lat.is_finite()
            || !self.location.lng.is_finite()
            || !(-90.0..=90.0).contains(&self.location.lat)
            || !(-180.0..=180.0).contains(&self.location.lng)
        {
            return Err(TripError::validation(format!(
                "invalid coordinates {}",
                self.location.format_coordinates()
            )));
        }
        Ok(())
    }

    /// Whether the caller expressed no weather preference
    #[must_use]
    pub fn accepts_any_weather(&self) -> bool {
        self.accepted_weather_codes.is_empty()
    }
}
