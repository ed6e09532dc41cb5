//! Outcome classification for forwarded requests.

use reqwest::StatusCode;
use serde_json::Value;

use crate::upstream::client::{RawResponse, TransportError};

/// Maximum number of characters of a foreign response body carried into
/// diagnostics. Bounded so error channels never leak unbounded content.
pub const MAX_BODY_EXCERPT_CHARS: usize = 200;

/// What a single forwarded request ultimately produced.
///
/// Exactly one variant per request. Outcomes are never persisted; they are
/// logged and mapped to a client response.
#[derive(Debug, Clone)]
pub enum UpstreamOutcome {
    /// Parsed JSON body, non-error status.
    Success(Value),

    /// A response arrived but the body is not JSON. Usually an ngrok
    /// interstitial page, sometimes a crashed server dumping HTML.
    MalformedResponse { status: StatusCode, excerpt: String },

    /// Valid JSON body carrying an HTTP error status.
    UpstreamError { status: StatusCode, message: String },

    /// No usable response at all, after the retry budget was spent.
    TransportFailure { message: String, attempts: u32 },
}

/// Classify a raw transport result into exactly one outcome.
///
/// Runs strictly after the upstream client has exhausted its retries. The
/// body is parsed before the status is inspected: a 200 wrapping an HTML
/// warning page is a malformed response, not a success.
pub fn classify(result: Result<RawResponse, TransportError>) -> UpstreamOutcome {
    match result {
        Err(error) => UpstreamOutcome::TransportFailure {
            message: error.message,
            attempts: error.attempts,
        },
        Ok(response) => match serde_json::from_str::<Value>(&response.body) {
            Err(_) => UpstreamOutcome::MalformedResponse {
                status: response.status,
                excerpt: body_excerpt(&response.body),
            },
            Ok(json) if !response.status.is_success() => UpstreamOutcome::UpstreamError {
                status: response.status,
                message: upstream_message(&json),
            },
            Ok(json) => UpstreamOutcome::Success(json),
        },
    }
}

/// First characters of a response body, for diagnosis.
fn body_excerpt(body: &str) -> String {
    body.chars().take(MAX_BODY_EXCERPT_CHARS).collect()
}

/// Pull a human-readable message out of a JSON error body.
fn upstream_message(body: &Value) -> String {
    body.get("detail")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| "upstream signalled failure".to_string())
}
