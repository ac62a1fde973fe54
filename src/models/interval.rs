//! Time window model

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, TripError};

/// Time window between two UTC instants, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for Interval {
    type Error = TripError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::new(raw.start, raw.end)
    }
}

impl Interval {
    /// Create a new interval, rejecting `start > end`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(TripError::validation(format!(
                "interval start {start} is after its end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Time elapsed between start and end
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Check if an instant lies within the interval, bounds included
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Check if any part of the given calendar day (UTC) falls in the interval
    #[must_use]
    pub fn overlaps_day(&self, date: NaiveDate) -> bool {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        let end = start
            .checked_add_signed(Duration::days(1) - Duration::nanoseconds(1))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let day = Self { start, end };
        // two closed ranges meet iff one holds the other's start
        self.contains(day.start) || day.contains(self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_interval_duration() {
        let interval = Interval::new(at(1, 9), at(1, 17)).unwrap();
        assert_eq!(interval.duration(), Duration::hours(8));
    }

    #[test]
    fn test_interval_rejects_reversed_bounds() {
        assert!(matches!(
            Interval::new(at(2, 9), at(1, 9)),
            Err(TripError::Validation { .. })
        ));
        // empty window is fine
        assert!(Interval::new(at(1, 9), at(1, 9)).is_ok());
    }

    #[test]
    fn test_interval_contains_bounds() {
        let interval = Interval::new(at(1, 9), at(1, 17)).unwrap();
        assert!(interval.contains(at(1, 9)));
        assert!(interval.contains(at(1, 12)));
        assert!(interval.contains(at(1, 17)));
        assert!(!interval.contains(at(1, 8)));
        assert!(!interval.contains(at(1, 18)));
    }

    #[test]
    fn test_interval_overlaps_day() {
        let interval = Interval::new(at(1, 13), at(3, 8)).unwrap();
        assert!(interval.overlaps_day(at(1, 0).date_naive()));
        assert!(interval.overlaps_day(at(3, 0).date_naive()));
        assert!(!interval.overlaps_day(at(4, 0).date_naive()));
        // strictly inside a single day
        let afternoon = Interval::new(at(2, 13), at(2, 20)).unwrap();
        assert!(afternoon.overlaps_day(at(2, 0).date_naive()));
        // starting on the stroke of midnight does not touch the day before
        let from_midnight = Interval::new(at(3, 0), at(3, 8)).unwrap();
        assert!(!from_midnight.overlaps_day(at(2, 0).date_naive()));
    }

    #[test]
    fn test_interval_deserialization_validates() {
        let ok: Interval = serde_json::from_str(
            r#"{"start":"2026-05-01T09:00:00Z","end":"2026-05-01T17:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(ok.duration(), Duration::hours(8));

        let reversed = serde_json::from_str::<Interval>(
            r#"{"start":"2026-05-01T17:00:00Z","end":"2026-05-01T09:00:00Z"}"#,
        );
        assert!(reversed.is_err());
    }
}
