//! Upstream HTTP client with bounded automatic retries.
//!
//! # Responsibilities
//! - Own the pooled `reqwest` client (the only shared resource)
//! - Apply the retry policy uniformly to http and https targets
//! - Enforce the per-attempt timeout handed down by the gateway
//!
//! # Design Decisions
//! - Construction is infallible and happens once at startup
//! - Retries cover statuses in the policy's retryable set and transport
//!   failures; each wire attempt carries the same timeout
//! - TLS certificate verification is always on

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::schema::RetryConfig;
use crate::resilience::backoff::calculate_backoff;
use crate::resilience::retries::{is_retryable_status, is_retryable_transport};

/// Response captured off the wire, before classification.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Transport-level failure, reported after the retry budget is spent.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub attempts: u32,
}

/// Pooled HTTP client bound to an immutable retry policy.
#[derive(Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    policy: RetryConfig,
}

impl UpstreamClient {
    /// Build a client for the given policy. The connection pool is shared by
    /// every forwarded request and is safe for concurrent use.
    pub fn new(policy: RetryConfig, connect_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .expect("failed to build HTTP client");

        Self { client, policy }
    }

    /// Send one logical request, retrying transient failures.
    ///
    /// `timeout` bounds each wire attempt, so the caller waits at most
    /// roughly `timeout × max_attempts` plus backoff delays.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            let mut request = self
                .client
                .request(method.clone(), url)
                .headers(headers.clone())
                .timeout(timeout);
            if let Some(json) = body {
                request = request.json(json);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if attempts < self.policy.max_attempts
                        && is_retryable_status(status, &self.policy.retryable_statuses)
                    {
                        let delay = calculate_backoff(
                            attempts,
                            self.policy.base_delay_ms,
                            self.policy.max_delay_ms,
                        );
                        tracing::info!(
                            %url,
                            attempt = attempts,
                            %status,
                            delay = ?delay,
                            "Retrying after retryable upstream status"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    let body = response.text().await.map_err(|e| TransportError {
                        message: format!("failed to read upstream response body: {e}"),
                        attempts,
                    })?;
                    return Ok(RawResponse { status, body });
                }
                Err(error) => {
                    if attempts < self.policy.max_attempts && is_retryable_transport(&error) {
                        let delay = calculate_backoff(
                            attempts,
                            self.policy.base_delay_ms,
                            self.policy.max_delay_ms,
                        );
                        tracing::info!(
                            %url,
                            attempt = attempts,
                            %error,
                            delay = ?delay,
                            "Retrying after transport failure"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return Err(TransportError {
                        message: error.to_string(),
                        attempts,
                    });
                }
            }
        }
    }
}
