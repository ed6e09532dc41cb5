//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones. Pure function:
//! `RelayConfig → Result<(), Vec<ValidationError>>`, returning every error
//! found rather than stopping at the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::RelayConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("retries.max_attempts must be at least 1")]
    ZeroRetryAttempts,

    #[error("retries.base_delay_ms must be greater than zero")]
    ZeroBackoffBase,

    #[error("retries.max_delay_ms ({max_ms}) is below base_delay_ms ({base_ms})")]
    BackoffCapBelowBase { base_ms: u64, max_ms: u64 },

    #[error("retries.retryable_statuses contains {0}, which is not an HTTP status")]
    InvalidRetryableStatus(u16),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a parsed configuration, collecting all problems.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::ZeroRetryAttempts);
    }
    if config.retries.base_delay_ms == 0 {
        errors.push(ValidationError::ZeroBackoffBase);
    }
    if config.retries.max_delay_ms < config.retries.base_delay_ms {
        errors.push(ValidationError::BackoffCapBelowBase {
            base_ms: config.retries.base_delay_ms,
            max_ms: config.retries.max_delay_ms,
        });
    }
    for status in &config.retries.retryable_statuses {
        if !(100..=599).contains(status) {
            errors.push(ValidationError::InvalidRetryableStatus(*status));
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.generate_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("generate_secs"));
    }
    if config.timeouts.test_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("test_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
