//! In-memory providers for pipeline tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use tripfinder::models::Leg;
use tripfinder::{
    Forecast, ForecastProvider, Interval, Itinerary, ItineraryResolver, Location, Place,
    PlaceFinder, Query, TimeAnchor, TripError,
};

pub type Result<T> = std::result::Result<T, TripError>;

pub fn home() -> Location {
    Location::new(46.5197, 6.6323)
}

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, hour, 0, 0).unwrap()
}

pub fn place(name: &str, lat: f64, lng: f64) -> Place {
    Place::new(Location::new(lat, lng), name, "park")
}

/// Day out from 08:00 to 20:00, accepting clear sky and light weather
pub fn query() -> Query {
    Query {
        location: home(),
        interval: Interval::new(at(8), at(20)).unwrap(),
        radius: 150_000,
        place_type: "park".to_string(),
        max_travel: Duration::hours(4),
        max_walk: Duration::hours(2),
        accepted_weather_codes: vec![800, 301, 615],
        max_results: 10,
        language: None,
    }
}

fn hang<T>() -> impl std::future::Future<Output = T> {
    std::future::pending()
}

pub enum PlacesBehavior {
    Found(Vec<Place>),
    Down,
    Hang,
}

pub struct MockPlaces {
    behavior: PlacesBehavior,
    pub calls: AtomicUsize,
}

impl MockPlaces {
    pub fn new(behavior: PlacesBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn found(places: Vec<Place>) -> Self {
        Self::new(PlacesBehavior::Found(places))
    }
}

#[async_trait]
impl PlaceFinder for MockPlaces {
    async fn find_nearby(&self, _: Location, _: u32, _: &str) -> Result<Vec<Place>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            PlacesBehavior::Found(places) => Ok(places.clone()),
            PlacesBehavior::Down => Err(TripError::provider_unavailable("places", "connection refused")),
            PlacesBehavior::Hang => hang().await,
        }
    }
}

/// How the mock answers for a given place, applied to both directions
/// unless stated otherwise
#[derive(Clone, Copy)]
pub enum RouteBehavior {
    Trip { walk: Duration, travel: Duration },
    NoRoute,
    Down,
    ReturnDown { walk: Duration, travel: Duration },
    /// The provider refuses the request itself
    Rejected,
    Hang,
}

impl RouteBehavior {
    pub fn trip(walk_minutes: i64, travel_minutes: i64) -> Self {
        Self::Trip {
            walk: Duration::minutes(walk_minutes),
            travel: Duration::minutes(travel_minutes),
        }
    }
}

pub struct MockRoutes {
    origin: Location,
    routes: HashMap<String, RouteBehavior>,
    fallback: RouteBehavior,
    delay: std::time::Duration,
    in_flight: AtomicUsize,
    pub peak: AtomicUsize,
    pub calls: AtomicUsize,
}

impl MockRoutes {
    pub fn new(fallback: RouteBehavior) -> Self {
        Self {
            origin: home(),
            routes: HashMap::new(),
            fallback,
            delay: std::time::Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_route(mut self, place: &Place, behavior: RouteBehavior) -> Self {
        self.routes.insert(place.location.cache_key(), behavior);
        self
    }

    /// Every call sleeps this long, to make overlapping calls observable
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = delay;
        self
    }

    fn itinerary(
        origin: Location,
        destination: Location,
        anchor: TimeAnchor,
        walk: Duration,
        travel: Duration,
    ) -> Itinerary {
        let total = walk + travel;
        let interval = match anchor {
            TimeAnchor::DepartAt(t) => Interval::new(t, t + total),
            TimeAnchor::ArriveBy(t) => Interval::new(t - total, t),
        }
        .unwrap();
        Itinerary::new(
            origin,
            destination,
            interval,
            10_000,
            vec![Leg::walking(walk), Leg::other(travel)],
            anchor,
        )
    }
}

#[async_trait]
impl ItineraryResolver for MockRoutes {
    async fn resolve(
        &self,
        origin: Location,
        destination: Location,
        anchor: TimeAnchor,
    ) -> Result<Option<Itinerary>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let outward = origin == self.origin;
        let remote = if outward { destination } else { origin };
        let behavior = self
            .routes
            .get(&remote.cache_key())
            .copied()
            .unwrap_or(self.fallback);

        match behavior {
            RouteBehavior::Trip { walk, travel } => Ok(Some(Self::itinerary(
                origin,
                destination,
                anchor,
                walk,
                travel,
            ))),
            RouteBehavior::ReturnDown { walk, travel } if outward => Ok(Some(Self::itinerary(
                origin,
                destination,
                anchor,
                walk,
                travel,
            ))),
            RouteBehavior::NoRoute => Ok(None),
            RouteBehavior::Down | RouteBehavior::ReturnDown { .. } => {
                Err(TripError::provider_unavailable("routing", "503 Service Unavailable"))
            }
            RouteBehavior::Rejected => Err(TripError::contract_violation(
                "directions rejected the request: departure time in the past",
            )),
            RouteBehavior::Hang => hang().await,
        }
    }
}

#[derive(Clone)]
pub enum ForecastBehavior {
    Codes(Vec<u16>),
    Down,
    BeyondHorizon,
    Hang,
}

pub struct MockForecasts {
    forecasts: HashMap<String, ForecastBehavior>,
    fallback: ForecastBehavior,
    /// Language of every call, in call order
    pub languages: Mutex<Vec<Option<String>>>,
}

impl MockForecasts {
    pub fn new(fallback: ForecastBehavior) -> Self {
        Self {
            forecasts: HashMap::new(),
            fallback,
            languages: Mutex::new(Vec::new()),
        }
    }

    pub fn clear_sky() -> Self {
        Self::new(ForecastBehavior::Codes(vec![800]))
    }

    pub fn with_forecast(mut self, place: &Place, behavior: ForecastBehavior) -> Self {
        self.forecasts.insert(place.location.cache_key(), behavior);
        self
    }
}

#[async_trait]
impl ForecastProvider for MockForecasts {
    async fn daily_forecasts(
        &self,
        location: Location,
        interval: &Interval,
        language: Option<&str>,
    ) -> Result<Vec<Forecast>> {
        self.languages
            .lock()
            .unwrap()
            .push(language.map(str::to_string));
        let behavior = self
            .forecasts
            .get(&location.cache_key())
            .cloned()
            .unwrap_or_else(|| self.fallback.clone());
        match behavior {
            ForecastBehavior::Codes(codes) => {
                Ok(vec![Forecast::new(location, interval.start(), codes)?])
            }
            ForecastBehavior::Down => {
                Err(TripError::provider_unavailable("weather", "connection reset"))
            }
            ForecastBehavior::BeyondHorizon => Err(TripError::contract_violation(
                "forecast requested beyond 7 days",
            )),
            ForecastBehavior::Hang => hang().await,
        }
    }
}
