//! Low-level HTTP client — `MetalsHttp`.
//!
//! One method per API endpoint. Returns wire types (conversion to domain types
//! happens at the sub-client boundary). Internal to the SDK; `BullionClient`
//! wraps this.

use crate::domain::history::wire::TimeSeriesResponse;
use crate::domain::history::HistoryWindow;
use crate::domain::quote::wire::LatestResponse;
use crate::error::HttpError;
use crate::http::retry::{RetryConfig, RetryPolicy};
use crate::shared::{metals_param, Metal};

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Low-level HTTP client for the metals REST API.
#[derive(Clone)]
pub struct MetalsHttp {
    base_url: String,
    client: Client,
    /// Sent as the `api_key` query parameter. Never logged.
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for MetalsHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetalsHttp")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("retry", &self.retry)
            .finish()
    }
}

impl MetalsHttp {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        retry: RetryPolicy,
    ) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(4)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            api_key,
            retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Latest ───────────────────────────────────────────────────────────

    pub async fn get_latest(&self, metals: &[Metal]) -> Result<LatestResponse, HttpError> {
        let url = format!(
            "{}/latest?metals={}",
            self.base_url,
            urlencoding::encode(&metals_param(metals))
        );
        self.get(&url).await
    }

    // ── Time series ──────────────────────────────────────────────────────

    pub async fn get_timeseries(
        &self,
        window: &HistoryWindow,
        metals: &[Metal],
    ) -> Result<TimeSeriesResponse, HttpError> {
        let url = format!(
            "{}/timeseries?start_date={}&end_date={}&metals={}",
            self.base_url,
            window.start_param(),
            window.end_param(),
            urlencoding::encode(&metals_param(metals))
        );
        self.get(&url).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    /// `url` is the key-less form; the key is appended only on the wire.
    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        tracing::debug!(url, "GET");
        let authed = match &self.api_key {
            Some(key) => format!("{}&api_key={}", url, urlencoding::encode(key)),
            None => url.to_string(),
        };
        self.request_with_retry(url, &authed).await
    }

    async fn request_with_retry<T: DeserializeOwned>(
        &self,
        log_url: &str,
        url: &str,
    ) -> Result<T, HttpError> {
        let config = match &self.retry {
            RetryPolicy::None => {
                return self.do_request(url).await;
            }
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
            RetryPolicy::Custom(c) => c.clone(),
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request::<T>(url).await {
                Ok(resp) => return Ok(resp),
                Err(e) => match config.next_delay(&e, attempt) {
                    Some(delay) => {
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying request to {}",
                            log_url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    }
                    // Retryable but out of attempts.
                    None if config.should_retry(&e) => last_error = Some(e),
                    None => return Err(e),
                },
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Reqwest(e.without_url())
            }
        })?;
        let status = resp.status();
        let retry_after_ms = retry_after_ms(resp.headers());

        let bytes = resp.bytes().await.map_err(|e| HttpError::Reqwest(e.without_url()))?;

        if status.is_success() {
            return serde_json::from_slice::<T>(&bytes)
                .map_err(|e| HttpError::Decode(e.to_string()));
        }

        let status_code = status.as_u16();
        let body_text = error_message(&bytes);

        match status_code {
            401 | 403 => Err(HttpError::Unauthorized(body_text)),
            404 => Err(HttpError::NotFound(body_text)),
            429 => Err(HttpError::RateLimited { retry_after_ms }),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

/// `Retry-After` in whole seconds, converted to milliseconds.
fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

/// Prefer the API's `error_message` over the raw body.
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error_message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

    #[test]
    fn test_error_message_prefers_api_field() {
        let body = br#"{"status":"failure","error_code":1101,"error_message":"Invalid API key"}"#;
        assert_eq!(error_message(body), "Invalid API key");
        assert_eq!(error_message(b"Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_retry_after_seconds() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after_ms(&headers), None);
        headers.insert(RETRY_AFTER, HeaderValue::from_static("3"));
        assert_eq!(retry_after_ms(&headers), Some(3000));
        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(retry_after_ms(&headers), None);
    }

    #[test]
    fn test_debug_redacts_key() {
        let http = MetalsHttp::new("https://api.metals.dev/v1/", Some("secret".into()), RetryPolicy::None)
            .unwrap();
        assert_eq!(http.base_url(), "https://api.metals.dev/v1");
        let dbg = format!("{:?}", http);
        assert!(!dbg.contains("secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
