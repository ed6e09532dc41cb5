//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → retries.rs (decide whether a failed attempt may be repeated)
//!     → backoff.rs (how long to wait before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Every upstream call carries a per-attempt deadline
//! - Retryable statuses come from the configured policy; transport-level
//!   failures (DNS, refused connection, TLS, timeout) are always transient
//! - Jittered exponential backoff prevents thundering herd
//! - The retry loop lives in the upstream client; nothing above it retries

pub mod backoff;
pub mod retries;
