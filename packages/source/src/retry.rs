//! HTTP retry helper for transient errors.
//!
//! Dataset fetchers call [`send_json`] instead of
//! `reqwest::RequestBuilder::send()` so every request gets automatic retry
//! with exponential backoff on timeouts, connection failures, HTTP 429,
//! and HTTP 5xx. Other 4xx responses are permanent and fail immediately.
//!
//! ```ignore
//! let body = retry::send_json(|| client.get(&url).query(&params)).await?;
//! ```

use std::time::Duration;

use reqwest::StatusCode;

use crate::SourceError;

/// Maximum number of retries after the first attempt.
///
/// Backoff is 1s, 2s, 4s, so a failing upstream gives up after ~7s of
/// waiting plus the per-request timeouts. The whole fetch is also
/// bounded by the store's fetch timeout.
const MAX_RETRIES: u32 = 3;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 300;

/// Sends an HTTP request and parses the response body as JSON.
///
/// `build_request` is called on each attempt, since builders are
/// consumed by `.send()`.
///
/// # Errors
///
/// Returns [`SourceError`] if the request still fails after all retries,
/// the server returns a non-retryable status, or the body is not JSON.
#[allow(clippy::future_not_send)]
pub async fn send_json<F>(build_request: F) -> Result<serde_json::Value, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = send_inner(&build_request).await?;
    let url = response.url().to_string();
    let text = response.text().await?;

    serde_json::from_str(&text).map_err(|e| {
        let preview: String = text.chars().take(BODY_PREVIEW_LEN).collect();
        log::error!(
            "JSON parse failed\n  url: {url}\n  received: {} bytes\n  error: {e}\n  body preview: {preview}",
            text.len()
        );
        SourceError::Json(e)
    })
}

/// Retry loop behind [`send_json`]. Returns the first 2xx/3xx response.
#[allow(clippy::future_not_send)]
async fn send_inner<F>(build_request: &F) -> Result<reqwest::Response, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = backoff(attempt);
            log::warn!("  retry {attempt}/{MAX_RETRIES} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }
        let exhausted = attempt >= MAX_RETRIES;
        attempt += 1;

        match build_request().send().await {
            Err(e) => {
                if is_transient(&e) && !exhausted {
                    log::warn!("  transient error: {e}");
                    continue;
                }
                return Err(SourceError::Http(e));
            }
            Ok(response) => {
                let status = response.status();

                if is_retryable_status(status) {
                    if !exhausted {
                        log::warn!("  HTTP {status} from {}", response.url());
                        continue;
                    }
                    return Err(SourceError::Normalization {
                        message: format!("HTTP {status} after {MAX_RETRIES} retries"),
                    });
                }

                if status.is_client_error() {
                    return Err(SourceError::Normalization {
                        message: format!("HTTP {status}"),
                    });
                }

                return Ok(response);
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based): 1s, 2s, 4s, ...
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << (attempt - 1).min(6))
}

/// Returns `true` for statuses worth retrying: 429 and all 5xx.
fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_request()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff(1), Duration::from_secs(1));
        assert_eq!(backoff(2), Duration::from_secs(2));
        assert_eq!(backoff(3), Duration::from_secs(4));
    }

    #[test]
    fn only_rate_limits_and_server_errors_are_retried() {
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(StatusCode::FORBIDDEN));
        assert!(!is_retryable_status(StatusCode::OK));
    }
}
