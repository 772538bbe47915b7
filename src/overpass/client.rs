//! HTTP client for the Overpass interpreter endpoint.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::form_urlencoded;

use super::types::{OverpassResponse, OverpassResult};
use crate::config::OverpassConfig;
use crate::error::{Error, Result};

/// Issues Overpass QL queries one at a time, retrying failures.
pub struct OverpassClient {
    client: Client,
    config: OverpassConfig,
}

/// Wait before retrying after a failed attempt (counted from 1).
///
/// Rate limiting (HTTP 429) backs off on the longer rate-limit delay.
pub fn backoff_delay(config: &OverpassConfig, rate_limited: bool, attempt: u32) -> Duration {
    let base = if rate_limited {
        config.rate_limit_delay()
    } else {
        config.retry_delay()
    };
    base * attempt.max(1)
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.url
    }

    /// Run a query and index the elements it returns
    pub async fn query(&self, ql: &str) -> Result<OverpassResult> {
        let max_attempts = self.config.max_retries.max(1);
        let mut attempts = 0;

        loop {
            attempts += 1;

            let (error, rate_limited) = match self.attempt(ql).await {
                Ok(response) => {
                    let result = OverpassResult::from_response(response);
                    debug!(
                        "Overpass returned {} nodes, {} ways, {} relations",
                        result.nodes().len(),
                        result.ways().len(),
                        result.relations().len()
                    );
                    return Ok(result);
                }
                Err(e) => {
                    let rate_limited = matches!(
                        e,
                        Error::OverpassStatus { status, .. }
                            if status == StatusCode::TOO_MANY_REQUESTS.as_u16()
                    );
                    (e, rate_limited)
                }
            };

            if attempts >= max_attempts {
                return Err(Error::RetriesExhausted {
                    attempts,
                    last_error: error.to_string(),
                });
            }

            let wait = backoff_delay(&self.config, rate_limited, attempts);
            warn!(
                "Overpass query failed (attempt {}/{}), retrying in {}s: {}",
                attempts,
                max_attempts,
                wait.as_secs(),
                error
            );
            tokio::time::sleep(wait).await;
        }
    }

    async fn attempt(&self, ql: &str) -> Result<OverpassResponse> {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("data", ql)
            .finish();

        let response = self
            .client
            .post(&self.config.url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::OverpassStatus {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }

        let bytes = response.bytes().await?;
        info!("Overpass response: {} bytes", bytes.len());
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_is_linear_in_attempt() {
        let config = OverpassConfig::default();
        assert_eq!(backoff_delay(&config, false, 1), Duration::from_secs(30));
        assert_eq!(backoff_delay(&config, false, 2), Duration::from_secs(60));
        assert_eq!(backoff_delay(&config, true, 1), Duration::from_secs(60));
        assert_eq!(backoff_delay(&config, true, 3), Duration::from_secs(180));
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate("kısa", 10), "kısa");
        assert_eq!(truncate("ğğğğ", 2), "ğğ...");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_exhausts_retries() {
        let config = OverpassConfig {
            url: "http://127.0.0.1:9/api/interpreter".to_string(),
            max_retries: 2,
            retry_delay_secs: 0,
            timeout_secs: 5,
            ..Default::default()
        };
        let client = OverpassClient::new(config).unwrap();
        match client.query("[out:json];node(1);out;").await {
            Err(Error::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 2),
            other => panic!("expected exhausted retries, got {:?}", other.map(|_| ())),
        }
    }
}
