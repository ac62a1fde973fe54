//! HTTP plumbing shared by the provider adapters

use std::time::{Duration, Instant};

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::ratelimit::RateLimiter;
use crate::{Result, TripError};

/// User agent sent with every provider request
pub const USER_AGENT: &str = concat!("TripFinder/", env!("CARGO_PKG_VERSION"));

/// Build a client retrying transient failures with exponential backoff
pub fn build_client(config: &HttpConfig) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| TripError::config(format!("Failed to create HTTP client: {e}")))?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// Rate-limited GET returning the decoded JSON body.
///
/// Transport failures and non-success statuses map to
/// [`TripError::ProviderUnavailable`], undecodable bodies to
/// [`TripError::Parse`].
pub async fn get_json<T: DeserializeOwned>(
    client: &ClientWithMiddleware,
    limiter: &RateLimiter,
    provider: &str,
    url: &str,
) -> Result<T> {
    limiter.acquire().await;
    let start_time = Instant::now();

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| TripError::provider_unavailable(provider, format!("request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(match status.as_u16() {
            401 | 403 => TripError::provider_unavailable(
                provider,
                format!("invalid or missing API key ({status})"),
            ),
            429 => TripError::provider_unavailable(provider, "rate limit exceeded"),
            _ => TripError::provider_unavailable(provider, format!("HTTP {status}: {error_text}")),
        });
    }

    let body = response
        .json::<T>()
        .await
        .map_err(|e| TripError::parse(format!("invalid {provider} response: {e}")))?;

    let elapsed = start_time.elapsed();
    debug!("{provider} answered in {:.3}s", elapsed.as_secs_f64());
    if elapsed.as_secs() > 5 {
        warn!("Slow {provider} response detected: {:.3}s", elapsed.as_secs_f64());
    }
    Ok(body)
}
