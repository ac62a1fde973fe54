//! Google Directions adapter

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{ItineraryResolver, TimeAnchor};
use crate::config::GoogleConfig;
use crate::http;
use crate::models::{Interval, Itinerary, Leg, Location};
use crate::ratelimit::RateLimiter;
use crate::{Result, TripError};

const PROVIDER: &str = "google-directions";

/// Google Directions API client
pub struct GoogleItineraryResolver {
    client: ClientWithMiddleware,
    limiter: Arc<RateLimiter>,
    api_key: String,
    base_url: String,
    travel_mode: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<Route>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Route {
    legs: Vec<RouteLeg>,
}

#[derive(Debug, Deserialize)]
struct RouteLeg {
    start_location: Location,
    end_location: Location,
    distance: ValueField<u32>,
    duration: ValueField<i64>,
    /// Absent when the route is walking only
    departure_time: Option<ValueField<i64>>,
    arrival_time: Option<ValueField<i64>>,
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    travel_mode: String,
    duration: ValueField<i64>,
}

#[derive(Debug, Deserialize)]
struct ValueField<T> {
    value: T,
}

impl GoogleItineraryResolver {
    /// Create a new client; fails if no API key is configured
    pub fn new(
        client: ClientWithMiddleware,
        config: &GoogleConfig,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TripError::config("Google API key is required for directions"))?;
        Ok(Self {
            client,
            limiter,
            api_key,
            base_url: config.directions_url.trim_end_matches('/').to_string(),
            travel_mode: config.travel_mode.clone(),
        })
    }

    fn directions_url(&self, origin: Location, destination: Location, anchor: TimeAnchor) -> String {
        let time_param = match anchor {
            TimeAnchor::DepartAt(at) => format!("departure_time={}", at.timestamp()),
            TimeAnchor::ArriveBy(at) => format!("arrival_time={}", at.timestamp()),
        };
        format!(
            "{}/json?origin={},{}&destination={},{}&mode={}&{}&units=metric&key={}",
            self.base_url,
            origin.lat,
            origin.lng,
            destination.lat,
            destination.lng,
            urlencoding::encode(&self.travel_mode),
            time_param,
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl ItineraryResolver for GoogleItineraryResolver {
    #[instrument(skip(self))]
    async fn resolve(
        &self,
        origin: Location,
        destination: Location,
        anchor: TimeAnchor,
    ) -> Result<Option<Itinerary>> {
        let url = self.directions_url(origin, destination, anchor);
        let response: DirectionsResponse =
            http::get_json(&self.client, &self.limiter, PROVIDER, &url).await?;
        let itinerary = parse_directions_response(response, anchor, &self.travel_mode)?;
        if itinerary.is_none() {
            debug!("No route found");
        }
        Ok(itinerary)
    }
}

fn parse_directions_response(
    response: DirectionsResponse,
    anchor: TimeAnchor,
    travel_mode: &str,
) -> Result<Option<Itinerary>> {
    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" | "NOT_FOUND" => return Ok(None),
        // INVALID_REQUEST included: a rejected lookup only costs this candidate
        status => {
            return Err(TripError::provider_unavailable(
                PROVIDER,
                format!("{status}: {}", response.error_message.unwrap_or_default()),
            ));
        }
    }

    let Some(route) = response.routes.into_iter().next() else {
        return Ok(None);
    };
    let leg = route
        .legs
        .into_iter()
        .next()
        .ok_or_else(|| TripError::parse("directions route has no legs"))?;

    to_itinerary(leg, anchor, travel_mode).map(Some)
}

fn to_itinerary(leg: RouteLeg, anchor: TimeAnchor, travel_mode: &str) -> Result<Itinerary> {
    let total = seconds(leg.duration.value)?;
    let interval = match (&leg.departure_time, &leg.arrival_time) {
        (Some(departure), Some(arrival)) => {
            Interval::new(timestamp(departure.value)?, timestamp(arrival.value)?)
        }
        // walking-only answers carry no times, derive them from the anchor
        _ => match anchor {
            TimeAnchor::DepartAt(at) => {
                let arrival = at
                    .checked_add_signed(total)
                    .ok_or_else(|| TripError::parse(format!("arrival after {at} out of range")))?;
                Interval::new(at, arrival)
            }
            TimeAnchor::ArriveBy(at) => {
                let departure = at
                    .checked_sub_signed(total)
                    .ok_or_else(|| TripError::parse(format!("departure before {at} out of range")))?;
                Interval::new(departure, at)
            }
        },
    }
    .map_err(|e| TripError::parse(format!("inconsistent directions times: {e}")))?;

    let legs = if leg.steps.is_empty() {
        vec![if travel_mode.eq_ignore_ascii_case("walking") {
            Leg::walking(total)
        } else {
            Leg::other(total)
        }]
    } else {
        leg.steps
            .iter()
            .map(|step| {
                let duration = seconds(step.duration.value)?;
                Ok(if step.travel_mode.eq_ignore_ascii_case("walking") {
                    Leg::walking(duration)
                } else {
                    Leg::other(duration)
                })
            })
            .collect::<Result<Vec<_>>>()?
    };

    Ok(Itinerary::new(
        leg.start_location,
        leg.end_location,
        interval,
        leg.distance.value,
        legs,
        anchor,
    ))
}

fn seconds(value: i64) -> Result<Duration> {
    if value < 0 {
        return Err(TripError::parse(format!("negative duration {value}")));
    }
    Duration::try_seconds(value).ok_or_else(|| TripError::parse(format!("duration {value} out of range")))
}

fn timestamp(value: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(value, 0)
        .ok_or_else(|| TripError::parse(format!("invalid timestamp {value}")))
}
