//! `TripFinder` - round-trip recommendations to nearby places
//!
//! This library discovers places around a starting point, resolves outward
//! and return itineraries, ranks the candidates by trip duration and keeps
//! those whose forecast weather is acceptable.

pub mod cache;
pub mod config;
pub mod error;
pub mod filters;
pub mod http;
pub mod logging;
pub mod models;
pub mod places;
pub mod ratelimit;
pub mod routing;
pub mod solution_factory;
pub mod weather;

// Re-export core types for public API
pub use cache::PersistentCache;
pub use config::TripFinderConfig;
pub use error::{Stage, TripError};
pub use filters::{filter_by_trip_duration, filter_by_weather};
pub use models::{
    Forecast, Interval, Itinerary, Location, Place, Query, Solution, SolutionInfo, TimeAnchor,
    WaitPolicy,
};
pub use places::PlaceFinder;
pub use routing::ItineraryResolver;
pub use solution_factory::SolutionFactory;
pub use weather::ForecastProvider;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripError>;
