//! Data models for `TripFinder`
//!
//! This module contains the domain models organized by concern:
//! - Location / Interval: geographic and time primitives
//! - Place, Itinerary, Forecast: what the providers return
//! - Solution: a candidate round trip and its derived metrics
//! - Query: validated search criteria

pub mod duration;
pub mod forecast;
pub mod interval;
pub mod itinerary;
pub mod location;
pub mod place;
pub mod query;
pub mod solution;

// Re-export all public types for convenient access
pub use forecast::{Forecast, ForecastDetails};
pub use interval::Interval;
pub use itinerary::{Itinerary, Leg, TimeAnchor, TravelMode};
pub use location::Location;
pub use place::Place;
pub use query::{DEFAULT_MAX_RESULTS, Query};
pub use solution::{Solution, SolutionInfo, WaitPolicy};
