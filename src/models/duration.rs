//! Duration parsing and serde helpers

use chrono::Duration;

use crate::{Result, TripError};

/// Serialize a [`Duration`] as whole seconds.
///
/// Deserialization also accepts the textual forms of [`parse_duration`] in
/// self-describing formats.
pub mod seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Seconds(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(duration.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        if !deserializer.is_human_readable() {
            let secs = i64::deserialize(deserializer)?;
            return Duration::try_seconds(secs)
                .ok_or_else(|| D::Error::custom("duration out of range"));
        }
        match Repr::deserialize(deserializer)? {
            Repr::Seconds(secs) => Duration::try_seconds(secs)
                .ok_or_else(|| D::Error::custom("duration out of range")),
            Repr::Text(text) => super::parse_duration(&text).map_err(D::Error::custom),
        }
    }
}

/// Parse `H:MM:SS`, `N day(s), H:MM:SS` or a plain number of seconds
pub fn parse_duration(input: &str) -> Result<Duration> {
    let input = input.trim();
    let invalid = || TripError::validation(format!("Invalid duration '{input}'"));

    if let Ok(secs) = input.parse::<i64>() {
        return Duration::try_seconds(secs).ok_or_else(invalid);
    }

    let (days, clock) = match input.split_once(',') {
        Some((day_part, clock)) => {
            let count = day_part
                .split_whitespace()
                .next()
                .and_then(|n| n.parse::<i64>().ok())
                .ok_or_else(invalid)?;
            if !day_part.contains("day") {
                return Err(invalid());
            }
            (count, clock.trim())
        }
        None => (0, input),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return Err(invalid());
    };
    let hours: i64 = hours.parse().map_err(|_| invalid())?;
    let minutes: i64 = minutes.parse().map_err(|_| invalid())?;
    // seconds may carry a fractional part, which is dropped
    let seconds: f64 = seconds.parse().map_err(|_| invalid())?;
    if minutes >= 60 || !(0.0..60.0).contains(&seconds) {
        return Err(invalid());
    }

    let total = days * 86_400 + hours * 3_600 + minutes * 60 + seconds.trunc() as i64;
    Duration::try_seconds(total).ok_or_else(invalid)
}
