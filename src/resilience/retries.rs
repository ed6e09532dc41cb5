//! Retry classification.
//!
//! Decides which failed attempts the upstream client may repeat. Status
//! codes are matched against the configured retryable set (conventionally
//! 500, 502, 503, 504); transport errors are always worth another try since
//! they usually mean the tunnel flapped. The generate POST is treated as
//! retry-safe: the upstream's side effects are request-scoped.

use reqwest::StatusCode;

/// Is this upstream status in the policy's retryable set?
pub fn is_retryable_status(status: StatusCode, retryable: &[u16]) -> bool {
    retryable.contains(&status.as_u16())
}

/// Did the transport itself fail in a way that may be transient?
///
/// Covers DNS failures, refused connections, TLS handshake errors and
/// timeouts. Errors raised while streaming an already-started response are
/// not repeated.
pub fn is_retryable_transport(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout() || error.is_request()
}
