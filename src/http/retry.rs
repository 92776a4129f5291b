//! Retry policies for metals API requests.
//!
//! The live pipeline already re-fetches on every tick, so the client makes a
//! single attempt unless the caller opts in.

use crate::error::HttpError;
use rand::Rng;
use std::time::Duration;

/// Retry policy applied to every request a `MetalsHttp` makes.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// Single attempt. A failed fetch goes straight to fallback data.
    #[default]
    None,
    /// [`RetryConfig::idempotent`].
    Idempotent,
    Custom(RetryConfig),
}

/// Backoff schedule and the failures worth retrying.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the initial request.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    /// Spread each delay by up to ±25%.
    pub jitter: bool,
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::idempotent()
    }
}

impl RetryConfig {
    /// Two retries on transport failures, 429 and 502/503/504.
    pub fn idempotent() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![429, 502, 503, 504],
        }
    }

    /// Whether `err` is worth another attempt under this config.
    pub fn should_retry(&self, err: &HttpError) -> bool {
        match err {
            HttpError::ServerError { status, .. } => self.retryable_statuses.contains(status),
            HttpError::RateLimited { .. } => self.retryable_statuses.contains(&429),
            HttpError::Timeout => true,
            HttpError::Reqwest(re) => re.is_connect() || re.is_timeout() || re.is_request(),
            HttpError::Unauthorized(_)
            | HttpError::NotFound(_)
            | HttpError::BadRequest(_)
            | HttpError::Decode(_)
            | HttpError::MaxRetriesExceeded { .. } => false,
        }
    }

    /// Wait before the next attempt, or `None` when `err` ends the request.
    ///
    /// A server-provided `Retry-After` replaces the backoff delay.
    pub fn next_delay(&self, err: &HttpError, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries || !self.should_retry(err) {
            return None;
        }
        match err {
            HttpError::RateLimited {
                retry_after_ms: Some(ms),
            } => Some(Duration::from_millis(*ms)),
            _ => Some(self.delay_for_attempt(attempt)),
        }
    }

    /// Delay before retry number `attempt + 1` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = i32::try_from(attempt).unwrap_or(i32::MAX);
        let base_ms = self.initial_delay.as_millis() as f64 * self.backoff_factor.powi(exp);
        let capped_ms = base_ms.min(self.max_delay.as_millis() as f64);

        let ms = if self.jitter && capped_ms > 0.0 {
            let spread = capped_ms * 0.25;
            rand::thread_rng().gen_range(capped_ms - spread..=capped_ms + spread)
        } else {
            capped_ms
        };

        Duration::from_millis(ms.max(0.0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(initial_ms: u64, max_ms: u64, factor: f64) -> RetryConfig {
        RetryConfig {
            initial_delay: Duration::from_millis(initial_ms),
            max_delay: Duration::from_millis(max_ms),
            backoff_factor: factor,
            jitter: false,
            ..RetryConfig::idempotent()
        }
    }

    #[test]
    fn test_default_policy_is_single_attempt() {
        assert!(matches!(RetryPolicy::default(), RetryPolicy::None));
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        let config = fixed(500, 3000, 2.0);
        let delays: Vec<u128> = (0..4).map(|a| config.delay_for_attempt(a).as_millis()).collect();
        assert_eq!(delays, vec![500, 1000, 2000, 3000]);
    }

    #[test]
    fn test_jitter_stays_within_a_quarter() {
        let config = RetryConfig::idempotent();
        for _ in 0..50 {
            let ms = config.delay_for_attempt(0).as_millis();
            assert!((375..=625).contains(&ms), "delay {} out of range", ms);
        }
    }

    #[test]
    fn test_which_failures_are_retried() {
        let config = RetryConfig::idempotent();
        assert!(config.should_retry(&HttpError::ServerError {
            status: 503,
            body: String::new()
        }));
        assert!(config.should_retry(&HttpError::RateLimited {
            retry_after_ms: Some(1000)
        }));
        assert!(config.should_retry(&HttpError::Timeout));
        assert!(!config.should_retry(&HttpError::ServerError {
            status: 500,
            body: String::new()
        }));
        assert!(!config.should_retry(&HttpError::Unauthorized("Invalid API key".into())));
        assert!(!config.should_retry(&HttpError::Decode("eof".into())));
    }

    #[test]
    fn test_retry_after_replaces_backoff() {
        let config = fixed(500, 3000, 2.0);
        let limited = HttpError::RateLimited {
            retry_after_ms: Some(7000),
        };
        assert_eq!(config.next_delay(&limited, 0), Some(Duration::from_millis(7000)));

        let no_header = HttpError::RateLimited {
            retry_after_ms: None,
        };
        assert_eq!(config.next_delay(&no_header, 1), Some(Duration::from_millis(1000)));
    }

    #[test]
    fn test_no_wait_when_no_attempt_follows() {
        let config = fixed(500, 3000, 2.0);
        let limited = HttpError::RateLimited {
            retry_after_ms: Some(7000),
        };
        assert_eq!(config.next_delay(&limited, config.max_retries), None);

        let no_retry_429 = RetryConfig {
            retryable_statuses: vec![503],
            ..config
        };
        assert_eq!(no_retry_429.next_delay(&limited, 0), None);
        assert_eq!(
            no_retry_429.next_delay(&HttpError::Unauthorized("bad key".into()), 0),
            None
        );
    }
}
