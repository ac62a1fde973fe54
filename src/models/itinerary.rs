//! Point-to-point travel plan model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{Interval, Location, duration};

/// The time an itinerary request is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum TimeAnchor {
    /// Leave the origin no earlier than this instant
    DepartAt(DateTime<Utc>),
    /// Reach the destination no later than this instant
    ArriveBy(DateTime<Utc>),
}

impl TimeAnchor {
    #[must_use]
    pub const fn instant(&self) -> DateTime<Utc> {
        match self {
            TimeAnchor::DepartAt(at) | TimeAnchor::ArriveBy(at) => *at,
        }
    }
}

/// Travel mode of a single leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Walking,
    Other,
}

/// One atomic segment of an itinerary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    pub mode: TravelMode,
    #[serde(with = "duration::seconds")]
    pub duration: Duration,
}

impl Leg {
    #[must_use]
    pub const fn walking(duration: Duration) -> Self {
        Self {
            mode: TravelMode::Walking,
            duration,
        }
    }

    #[must_use]
    pub const fn other(duration: Duration) -> Self {
        Self {
            mode: TravelMode::Other,
            duration,
        }
    }
}

/// Point-to-point travel plan
///
/// Walk, travel and wait durations are derived once in [`Itinerary::new`]
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawItinerary")]
pub struct Itinerary {
    start_location: Location,
    end_location: Location,
    interval: Interval,
    /// Distance covered in meters
    distance: u32,
    legs: Vec<Leg>,
    #[serde(with = "duration::seconds")]
    walk_duration: Duration,
    #[serde(with = "duration::seconds")]
    travel_duration: Duration,
    #[serde(with = "duration::seconds")]
    wait_duration: Duration,
}

/// Stored form of an [`Itinerary`].
///
/// Field order matches the serialized struct so positional formats such as
/// postcard read it back. Leg sums are recomputed from `legs`; the wait is
/// kept because the anchor it came from is not stored.
#[derive(Deserialize)]
struct RawItinerary {
    start_location: Location,
    end_location: Location,
    interval: Interval,
    distance: u32,
    legs: Vec<Leg>,
    #[serde(rename = "walk_duration", default, with = "duration::seconds")]
    _walk_duration: Duration,
    #[serde(rename = "travel_duration", default, with = "duration::seconds")]
    _travel_duration: Duration,
    #[serde(default, with = "duration::seconds")]
    wait_duration: Duration,
}

impl From<RawItinerary> for Itinerary {
    fn from(raw: RawItinerary) -> Self {
        Self::with_wait(
            raw.start_location,
            raw.end_location,
            raw.interval,
            raw.distance,
            raw.legs,
            raw.wait_duration,
        )
    }
}

impl Itinerary {
    /// Build an itinerary and derive its durations.
    ///
    /// `anchor` is the time the itinerary was requested for; the gap between
    /// it and the itinerary's own window is kept as `wait_duration`.
    #[must_use]
    pub fn new(
        start_location: Location,
        end_location: Location,
        interval: Interval,
        distance: u32,
        legs: Vec<Leg>,
        anchor: TimeAnchor,
    ) -> Self {
        let gap = match anchor {
            TimeAnchor::DepartAt(at) => interval.start() - at,
            TimeAnchor::ArriveBy(at) => at - interval.end(),
        };
        Self::with_wait(start_location, end_location, interval, distance, legs, gap)
    }

    fn with_wait(
        start_location: Location,
        end_location: Location,
        interval: Interval,
        distance: u32,
        legs: Vec<Leg>,
        wait: Duration,
    ) -> Self {
        let sum = |mode: TravelMode| {
            legs.iter()
                .filter(|leg| leg.mode == mode)
                .fold(Duration::zero(), |acc, leg| acc + leg.duration)
        };
        let walk_duration = sum(TravelMode::Walking);
        let travel_duration = sum(TravelMode::Other);
        let wait_duration = wait.max(Duration::zero());

        Self {
            start_location,
            end_location,
            interval,
            distance,
            legs,
            walk_duration,
            travel_duration,
            wait_duration,
        }
    }

    #[must_use]
    pub const fn start_location(&self) -> Location {
        self.start_location
    }

    #[must_use]
    pub const fn end_location(&self) -> Location {
        self.end_location
    }

    #[must_use]
    pub const fn interval(&self) -> Interval {
        self.interval
    }

    #[must_use]
    pub const fn distance(&self) -> u32 {
        self.distance
    }

    #[must_use]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Sum of walking legs
    #[must_use]
    pub const fn walk_duration(&self) -> Duration {
        self.walk_duration
    }

    /// Sum of non-walking legs
    #[must_use]
    pub const fn travel_duration(&self) -> Duration {
        self.travel_duration
    }

    /// Idle time between the requested anchor and the itinerary window
    #[must_use]
    pub const fn wait_duration(&self) -> Duration {
        self.wait_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, hour, minute, 0).unwrap()
    }

    fn itinerary(window: (DateTime<Utc>, DateTime<Utc>), anchor: TimeAnchor) -> Itinerary {
        Itinerary::new(
            Location::new(46.52, 6.63),
            Location::new(46.20, 6.14),
            Interval::new(window.0, window.1).unwrap(),
            62_000,
            vec![
                Leg::walking(Duration::minutes(7)),
                Leg::other(Duration::minutes(35)),
                Leg::walking(Duration::minutes(5)),
                Leg::other(Duration::minutes(10)),
            ],
            anchor,
        )
    }

    #[test]
    fn test_leg_durations_are_split_by_mode() {
        let it = itinerary((at(9, 0), at(9, 57)), TimeAnchor::DepartAt(at(9, 0)));
        assert_eq!(it.walk_duration(), Duration::minutes(12));
        assert_eq!(it.travel_duration(), Duration::minutes(45));
        assert_eq!(it.wait_duration(), Duration::zero());
    }

    #[test]
    fn test_wait_after_departure_anchor() {
        let it = itinerary((at(9, 20), at(10, 17)), TimeAnchor::DepartAt(at(9, 0)));
        assert_eq!(it.wait_duration(), Duration::minutes(20));
    }

    #[test]
    fn test_wait_before_arrival_anchor() {
        let it = itinerary((at(16, 0), at(16, 57)), TimeAnchor::ArriveBy(at(17, 30)));
        assert_eq!(it.wait_duration(), Duration::minutes(33));
    }

    #[test]
    fn test_wait_never_negative() {
        // provider answered with a departure earlier than requested
        let it = itinerary((at(8, 50), at(9, 47)), TimeAnchor::DepartAt(at(9, 0)));
        assert_eq!(it.wait_duration(), Duration::zero());
    }

    #[test]
    fn test_deserialization_recomputes_leg_sums() {
        let stored = itinerary((at(9, 20), at(10, 17)), TimeAnchor::DepartAt(at(9, 0)));
        let mut json = serde_json::to_value(&stored).unwrap();
        json["walk_duration"] = serde_json::json!(1);
        json["travel_duration"] = serde_json::json!(99_999);

        let restored: Itinerary = serde_json::from_value(json).unwrap();
        assert_eq!(restored.walk_duration(), Duration::minutes(12));
        assert_eq!(restored.travel_duration(), Duration::minutes(45));
        assert_eq!(restored.wait_duration(), Duration::minutes(20));
        assert_eq!(restored, stored);
    }

    #[test]
    fn test_stored_negative_wait_is_clamped() {
        let mut json = serde_json::to_value(itinerary(
            (at(9, 0), at(9, 57)),
            TimeAnchor::DepartAt(at(9, 0)),
        ))
        .unwrap();
        json["wait_duration"] = serde_json::json!(-600);

        let restored: Itinerary = serde_json::from_value(json).unwrap();
        assert_eq!(restored.wait_duration(), Duration::zero());
    }

    #[test]
    fn test_empty_legs() {
        let it = Itinerary::new(
            Location::new(0.0, 0.0),
            Location::new(0.0, 0.0),
            Interval::new(at(9, 0), at(9, 0)).unwrap(),
            0,
            vec![],
            TimeAnchor::DepartAt(at(9, 0)),
        );
        assert_eq!(it.walk_duration(), Duration::zero());
        assert_eq!(it.travel_duration(), Duration::zero());
    }
}
