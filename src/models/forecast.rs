//! Daily weather forecast model

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Location;
use crate::{Result, TripError};

/// Daily weather summary for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    location: Location,
    datetime: DateTime<Utc>,
    /// Weather condition ids (OpenWeather numbering), never empty
    condition_codes: BTreeSet<u16>,
    #[serde(default)]
    details: ForecastDetails,
}

/// Optional readings carried along for display
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastDetails {
    /// Minimum temperature in Celsius
    pub temperature_min: Option<f32>,
    /// Maximum temperature in Celsius
    pub temperature_max: Option<f32>,
    /// Relative humidity in percent
    pub humidity: Option<u8>,
    /// Wind speed in m/s
    pub wind_speed: Option<f32>,
    /// Human-readable description of the conditions
    pub description: Option<String>,
}

impl Forecast {
    /// Create a forecast, rejecting an empty condition set
    pub fn new<I>(location: Location, datetime: DateTime<Utc>, condition_codes: I) -> Result<Self>
    where
        I: IntoIterator<Item = u16>,
    {
        let condition_codes: BTreeSet<u16> = condition_codes.into_iter().collect();
        if condition_codes.is_empty() {
            return Err(TripError::parse(format!(
                "forecast for {} at {datetime} has no condition codes",
                location.format_coordinates()
            )));
        }
        Ok(Self {
            location,
            datetime,
            condition_codes,
            details: ForecastDetails::default(),
        })
    }

    #[must_use]
    pub fn with_details(mut self, details: ForecastDetails) -> Self {
        self.details = details;
        self
    }

    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    #[must_use]
    pub const fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }

    #[must_use]
    pub const fn condition_codes(&self) -> &BTreeSet<u16> {
        &self.condition_codes
    }

    #[must_use]
    pub const fn details(&self) -> &ForecastDetails {
        &self.details
    }
}
