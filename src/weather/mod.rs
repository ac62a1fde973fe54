//! Daily weather forecasts

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::models::{Forecast, Interval, Location};
use crate::{Result, TripError};

pub mod openweather;

pub use openweather::OpenWeatherForecastProvider;

/// Furthest ahead a forecast can be requested, counted from now
pub const FORECAST_HORIZON_DAYS: i64 = 7;

#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Daily forecasts for the days the interval touches.
    ///
    /// Fails with a contract violation when the interval ends past the
    /// forecast horizon. Fewer days than requested is a valid answer.
    /// `language` overrides the provider's default description language.
    async fn daily_forecasts(
        &self,
        location: Location,
        interval: &Interval,
        language: Option<&str>,
    ) -> Result<Vec<Forecast>>;
}

/// Reject intervals ending after `now + FORECAST_HORIZON_DAYS`
pub fn ensure_within_horizon(interval: &Interval, now: DateTime<Utc>) -> Result<()> {
    let horizon = now + Duration::days(FORECAST_HORIZON_DAYS);
    if interval.end() > horizon {
        return Err(TripError::contract_violation(format!(
            "forecast requested until {} but only available until {}",
            interval.end(),
            horizon
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_horizon() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let inside = Interval::new(now, now + Duration::days(7)).unwrap();
        let outside = Interval::new(now, now + Duration::days(7) + Duration::seconds(1)).unwrap();

        assert!(ensure_within_horizon(&inside, now).is_ok());
        assert!(matches!(
            ensure_within_horizon(&outside, now),
            Err(TripError::ContractViolation { .. })
        ));
    }
}
