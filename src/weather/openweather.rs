//! OpenWeather One Call daily forecast adapter

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{ForecastProvider, ensure_within_horizon};
use crate::config::OpenWeatherConfig;
use crate::http;
use crate::models::{Forecast, ForecastDetails, Interval, Location};
use crate::ratelimit::RateLimiter;
use crate::{Result, TripError};

const PROVIDER: &str = "openweather";

pub struct OpenWeatherForecastProvider {
    client: ClientWithMiddleware,
    limiter: Arc<RateLimiter>,
    api_key: String,
    base_url: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct OneCallResponse {
    daily: Vec<DailyEntry>,
}

#[derive(Debug, Deserialize)]
struct DailyEntry {
    /// Unix timestamp, midday of the forecast day
    dt: i64,
    temp: Option<DailyTemperature>,
    humidity: Option<u8>,
    wind_speed: Option<f32>,
    weather: Vec<WeatherCondition>,
}

#[derive(Debug, Deserialize)]
struct DailyTemperature {
    min: f32,
    max: f32,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    id: u16,
    description: Option<String>,
}

impl OpenWeatherForecastProvider {
    pub fn new(
        client: ClientWithMiddleware,
        config: &OpenWeatherConfig,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TripError::config("OpenWeather API key is required for forecasts"))?;
        Ok(Self {
            client,
            limiter,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    fn onecall_url(&self, location: Location, language: &str) -> String {
        format!(
            "{}/onecall?lat={}&lon={}&exclude=current,minutely,hourly,alerts&units=metric&lang={}&appid={}",
            self.base_url,
            location.lat,
            location.lng,
            urlencoding::encode(language),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherForecastProvider {
    #[instrument(skip(self))]
    async fn daily_forecasts(
        &self,
        location: Location,
        interval: &Interval,
        language: Option<&str>,
    ) -> Result<Vec<Forecast>> {
        ensure_within_horizon(interval, Utc::now())?;

        let url = self.onecall_url(location, language.unwrap_or(&self.language));
        let response: OneCallResponse =
            http::get_json(&self.client, &self.limiter, PROVIDER, &url).await?;
        let forecasts = parse_daily(response, location, interval)?;
        debug!("Got {} daily forecasts", forecasts.len());
        Ok(forecasts)
    }
}

fn parse_daily(
    response: OneCallResponse,
    location: Location,
    interval: &Interval,
) -> Result<Vec<Forecast>> {
    let mut forecasts = Vec::new();
    for day in response.daily {
        let datetime = DateTime::from_timestamp(day.dt, 0)
            .ok_or_else(|| TripError::parse(format!("invalid forecast timestamp {}", day.dt)))?;
        if !interval.overlaps_day(datetime.date_naive()) {
            continue;
        }

        let description = day
            .weather
            .iter()
            .filter_map(|w| w.description.as_deref())
            .collect::<Vec<_>>()
            .join(", ");
        let details = ForecastDetails {
            temperature_min: day.temp.as_ref().map(|t| t.min),
            temperature_max: day.temp.as_ref().map(|t| t.max),
            humidity: day.humidity,
            wind_speed: day.wind_speed,
            description: (!description.is_empty()).then_some(description),
        };

        let forecast = Forecast::new(location, datetime, day.weather.iter().map(|w| w.id))?
            .with_details(details);
        forecasts.push(forecast);
    }
    Ok(forecasts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ONECALL: &str = r#"{
        "lat": 46.52, "lon": 6.63, "timezone": "Europe/Zurich",
        "daily": [
            {"dt": 1777633200, "temp": {"min": 8.1, "max": 17.4, "day": 15.0},
             "humidity": 61, "wind_speed": 3.2,
             "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}]},
            {"dt": 1777719600, "temp": {"min": 9.0, "max": 14.2},
             "humidity": 80, "wind_speed": 5.1,
             "weather": [{"id": 500, "description": "light rain"}, {"id": 803}]},
            {"dt": 1777806000, "temp": {"min": 7.5, "max": 12.0},
             "weather": [{"id": 501, "description": "moderate rain"}]}
        ]
    }"#;

    fn two_days() -> Interval {
        Interval::new(
            Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 5, 2, 18, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_keeps_days_touched_by_interval() {
        let response: OneCallResponse = serde_json::from_str(ONECALL).unwrap();
        let forecasts = parse_daily(response, Location::new(46.52, 6.63), &two_days()).unwrap();

        assert_eq!(forecasts.len(), 2);
        assert!(forecasts[0].condition_codes().contains(&800));
        assert_eq!(
            forecasts[1].condition_codes().iter().copied().collect::<Vec<_>>(),
            vec![500, 803]
        );
        assert_eq!(forecasts[0].details().humidity, Some(61));
        assert_eq!(forecasts[1].details().description.as_deref(), Some("light rain"));
    }

    #[test]
    fn test_day_kept_when_interval_misses_forecast_instant() {
        // forecast instant is 11:00 UTC, the outing starts after it
        let afternoon = Interval::new(
            Utc.with_ymd_and_hms(2026, 5, 1, 13, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 5, 1, 20, 0, 0).unwrap(),
        )
        .unwrap();
        let response: OneCallResponse = serde_json::from_str(ONECALL).unwrap();
        let forecasts = parse_daily(response, Location::new(46.52, 6.63), &afternoon).unwrap();

        assert_eq!(forecasts.len(), 1);
        assert!(forecasts[0].condition_codes().contains(&800));
    }

    #[test]
    fn test_partial_coverage_is_valid() {
        let response: OneCallResponse = serde_json::from_str(
            r#"{"daily": [{"dt": 1777633200, "weather": [{"id": 800}]}]}"#,
        )
        .unwrap();
        let forecasts = parse_daily(response, Location::new(46.52, 6.63), &two_days()).unwrap();
        assert_eq!(forecasts.len(), 1);
        assert_eq!(forecasts[0].details().temperature_max, None);
    }

    #[test]
    fn test_day_without_conditions_fails_loudly() {
        let response: OneCallResponse =
            serde_json::from_str(r#"{"daily": [{"dt": 1777633200, "weather": []}]}"#).unwrap();
        let err = parse_daily(response, Location::new(46.52, 6.63), &two_days()).unwrap_err();
        assert!(matches!(err, TripError::Parse { .. }));
    }

    #[test]
    fn test_url_carries_requested_language() {
        let config = OpenWeatherConfig {
            api_key: Some("secret".to_string()),
            ..OpenWeatherConfig::default()
        };
        let provider = OpenWeatherForecastProvider::new(
            http::build_client(&crate::config::HttpConfig::default()).unwrap(),
            &config,
            Arc::new(RateLimiter::new(60)),
        )
        .unwrap();

        let url = provider.onecall_url(Location::new(46.52, 6.63), "fr");
        assert!(url.contains("&lang=fr&"));
        assert!(url.contains("lat=46.52&lon=6.63"));
        assert!(url.ends_with("appid=secret"));
    }

    #[test]
    fn test_missing_daily_block_fails_loudly() {
        assert!(serde_json::from_str::<OneCallResponse>(r#"{"lat": 1.0}"#).is_err());
    }
}
