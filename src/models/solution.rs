//! Round-trip solution model

use std::collections::BTreeSet;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{Forecast, Interval, Itinerary, Location, Place, duration};

/// Whether idle time around the itineraries counts as travel time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitPolicy {
    /// Only the legs' own durations count as travel
    #[default]
    Exclude,
    /// Waiting between the query bounds and the itinerary windows is added
    /// to the travel duration
    FoldIntoTravel,
}

/// Derived metrics of a solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SolutionInfo {
    #[serde(with = "duration::seconds")]
    pub walk_duration: Duration,
    #[serde(with = "duration::seconds")]
    pub travel_duration: Duration,
    #[serde(with = "duration::seconds")]
    pub total_trip_duration: Duration,
    /// May be negative when the trip does not fit the interval
    #[serde(with = "duration::seconds")]
    pub free_time: Duration,
}

/// A destination reached and left again within the requested interval.
///
/// Only ever built by [`Solution::assemble`], so it is serialized for output
/// but never deserialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    start_location: Location,
    interval: Interval,
    destination: Place,
    outward_itinerary: Itinerary,
    return_itinerary: Itinerary,
    forecasts: Vec<Forecast>,
    info: SolutionInfo,
}

impl Solution {
    /// Assemble a candidate from its two itineraries and derive its metrics
    #[must_use]
    pub fn assemble(
        start_location: Location,
        interval: Interval,
        destination: Place,
        outward_itinerary: Itinerary,
        return_itinerary: Itinerary,
        wait_policy: WaitPolicy,
    ) -> Self {
        let walk_duration = outward_itinerary.walk_duration() + return_itinerary.walk_duration();
        let mut travel_duration =
            outward_itinerary.travel_duration() + return_itinerary.travel_duration();
        if wait_policy == WaitPolicy::FoldIntoTravel {
            travel_duration = travel_duration
                + outward_itinerary.wait_duration()
                + return_itinerary.wait_duration();
        }
        let total_trip_duration = walk_duration + travel_duration;
        let free_time = interval.duration() - total_trip_duration - destination.visit_duration;

        Self {
            start_location,
            interval,
            destination,
            outward_itinerary,
            return_itinerary,
            forecasts: Vec::new(),
            info: SolutionInfo {
                walk_duration,
                travel_duration,
                total_trip_duration,
                free_time,
            },
        }
    }

    /// Attach the destination forecasts
    #[must_use]
    pub fn with_forecasts(self, forecasts: Vec<Forecast>) -> Self {
        Self { forecasts, ..self }
    }

    #[must_use]
    pub const fn start_location(&self) -> Location {
        self.start_location
    }

    #[must_use]
    pub const fn interval(&self) -> Interval {
        self.interval
    }

    #[must_use]
    pub const fn destination(&self) -> &Place {
        &self.destination
    }

    #[must_use]
    pub const fn outward_itinerary(&self) -> &Itinerary {
        &self.outward_itinerary
    }

    #[must_use]
    pub const fn return_itinerary(&self) -> &Itinerary {
        &self.return_itinerary
    }

    #[must_use]
    pub fn forecasts(&self) -> &[Forecast] {
        &self.forecasts
    }

    #[must_use]
    pub const fn info(&self) -> &SolutionInfo {
        &self.info
    }

    #[must_use]
    pub const fn walk_duration(&self) -> Duration {
        self.info.walk_duration
    }

    #[must_use]
    pub const fn travel_duration(&self) -> Duration {
        self.info.travel_duration
    }

    #[must_use]
    pub const fn total_trip_duration(&self) -> Duration {
        self.info.total_trip_duration
    }

    #[must_use]
    pub const fn free_time(&self) -> Duration {
        self.info.free_time
    }

    /// Union of the condition codes of every attached forecast
    #[must_use]
    pub fn condition_codes(&self) -> BTreeSet<u16> {
        self.forecasts
            .iter()
            .flat_map(|forecast| forecast.condition_codes().iter().copied())
            .collect()
    }
}
