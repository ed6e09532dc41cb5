//! Forwarding gateway: the request/response boundary logic.
//!
//! # Responsibilities
//! - Validate the caller-supplied Colab URL before any network call
//! - Normalize the base URL and derive the upstream path
//! - Dispatch through the upstream client with the right timeout
//! - Classify the result into exactly one terminal outcome
//!
//! # Design Decisions
//! - No retries at this layer; the upstream client already performed them
//! - The ngrok skip header is advisory; interstitial pages are detected by
//!   body shape during classification

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;
use crate::upstream::client::UpstreamClient;
use crate::upstream::outcome::{classify, UpstreamOutcome};

/// Header telling ngrok to skip its browser warning page. Cosmetic to the
/// upstream itself, which must tolerate it.
pub const SKIP_WARNING_HEADER: &str = "ngrok-skip-browser-warning";

/// Caller-facing failure taxonomy.
///
/// `InvalidInput` is a caller mistake and maps to 400; everything else is an
/// upstream-side fault and maps to 502. The `Display` strings double as the
/// diagnostic `detail` the UI shows.
#[derive(Debug, Clone, Error)]
pub enum ForwardError {
    /// Caller mistake; nothing was sent upstream.
    #[error("{0}")]
    InvalidInput(String),

    /// No usable response after the retry budget was spent.
    #[error("Failed to contact Colab: {message}")]
    TransportFailure { message: String, attempts: u32 },

    /// A response arrived but not in the expected shape.
    #[error(
        "Received invalid response from Colab (HTTP {status}). \
         Likely Ngrok warning page or server error. Body starts: {excerpt}"
    )]
    MalformedResponse { status: u16, excerpt: String },

    /// The upstream explicitly signalled failure.
    #[error("Colab returned HTTP {status}: {message}")]
    UpstreamError { status: u16, message: String },
}

/// Stateless per-request forwarding machine. Shares nothing between calls
/// except the pooled client and the read-only timeouts.
pub struct ForwardingGateway {
    client: UpstreamClient,
    generate_timeout: Duration,
    test_timeout: Duration,
}

impl ForwardingGateway {
    pub fn new(config: &RelayConfig) -> Self {
        let client = UpstreamClient::new(
            config.retries.clone(),
            Duration::from_secs(config.timeouts.connect_secs),
        );
        Self {
            client,
            generate_timeout: Duration::from_secs(config.timeouts.generate_secs),
            test_timeout: Duration::from_secs(config.timeouts.test_secs),
        }
    }

    /// Forward a generation request to `{base}/generate`.
    ///
    /// The upstream's JSON body is returned verbatim on success.
    pub async fn generate(
        &self,
        prompt: &str,
        target_base_url: &str,
    ) -> Result<Value, ForwardError> {
        let base = normalize_base_url(target_base_url)?;
        let url = format!("{base}/generate");
        tracing::info!(url = %url, "Forwarding generation request");

        let payload = json!({ "prompt": prompt });
        let outcome = self
            .dispatch(Method::POST, &url, Some(&payload), self.generate_timeout)
            .await;
        into_result(outcome, &url)
    }

    /// Probe the upstream's root endpoint and wrap whatever JSON it answers
    /// as `{"status": "connected", "colab_response": <body>}`.
    pub async fn test_connection(&self, target_base_url: &str) -> Result<Value, ForwardError> {
        let base = normalize_base_url(target_base_url)?;
        let url = format!("{base}/");
        tracing::info!(url = %url, "Testing upstream connection");

        let outcome = self.dispatch(Method::GET, &url, None, self.test_timeout).await;
        let body = into_result(outcome, &url)?;
        Ok(json!({ "status": "connected", "colab_response": body }))
    }

    async fn dispatch(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        timeout: Duration,
    ) -> UpstreamOutcome {
        let mut headers = HeaderMap::new();
        headers.insert(SKIP_WARNING_HEADER, HeaderValue::from_static("true"));
        classify(self.client.send(method, url, headers, body, timeout).await)
    }
}

/// Check and normalize the caller-supplied base URL.
///
/// Trailing slashes are stripped so derived paths never contain `//`.
/// Rejections happen before any network call.
fn normalize_base_url(raw: &str) -> Result<String, ForwardError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ForwardError::InvalidInput("Colab URL is required".to_string()));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| ForwardError::InvalidInput(format!("Colab URL is not valid: {e}")))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ForwardError::InvalidInput(format!(
            "Colab URL must use http or https, got {}",
            parsed.scheme()
        )));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn into_result(outcome: UpstreamOutcome, url: &str) -> Result<Value, ForwardError> {
    match outcome {
        UpstreamOutcome::Success(body) => Ok(body),
        UpstreamOutcome::TransportFailure { message, attempts } => {
            tracing::warn!(url = %url, attempts, %message, "Upstream unreachable");
            Err(ForwardError::TransportFailure { message, attempts })
        }
        UpstreamOutcome::MalformedResponse { status, excerpt } => {
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                excerpt = %excerpt,
                "Upstream response was not JSON"
            );
            Err(ForwardError::MalformedResponse {
                status: status.as_u16(),
                excerpt,
            })
        }
        UpstreamOutcome::UpstreamError { status, message } => {
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                %message,
                "Upstream signalled failure"
            );
            Err(ForwardError::UpstreamError {
                status: status.as_u16(),
                message,
            })
        }
    }
}
