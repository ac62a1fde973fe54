//! Sliding-window rate limiter shared by provider adapters

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

const WINDOW: Duration = Duration::from_secs(60);

/// Rate limiter for API requests
#[derive(Debug)]
pub struct RateLimiter {
    /// Maximum requests per minute
    max_requests_per_minute: u32,
    /// Request timestamps within the current window
    request_times: Mutex<Vec<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter; zero is treated as one request per minute
    #[must_use]
    pub fn new(max_requests_per_minute: u32) -> Self {
        Self {
            max_requests_per_minute: max_requests_per_minute.max(1),
            request_times: Mutex::new(Vec::new()),
        }
    }

    /// Check if a request is allowed right now and record it
    pub async fn try_acquire(&self) -> bool {
        let mut times = self.request_times.lock().await;
        Self::cleanup_old_requests(&mut times);
        if times.len() >= self.max_requests_per_minute as usize {
            false
        } else {
            times.push(Instant::now());
            true
        }
    }

    /// Wait until a request is allowed, then record it
    pub async fn acquire(&self) {
        while !self.try_acquire().await {
            let wait = Self::time_until_next_request(&self.request_times.lock().await);
            debug!("Rate limit reached, waiting {:.3}s", wait.as_secs_f64());
            tokio::time::sleep(wait).await;
        }
    }

    /// Time until the oldest request leaves the window
    fn time_until_next_request(times: &[Instant]) -> Duration {
        times
            .first()
            .map(|oldest| WINDOW.saturating_sub(oldest.elapsed()))
            .unwrap_or_default()
    }

    /// Remove requests older than the window
    fn cleanup_old_requests(times: &mut Vec<Instant>) {
        let now = Instant::now();
        times.retain(|&time| now.duration_since(time) < WINDOW);
    }
}
