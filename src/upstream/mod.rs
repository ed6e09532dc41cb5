//! Upstream forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! http handler
//!     → gateway.rs (validate target, derive URL, pick timeout)
//!     → client.rs (send with retry + backoff)
//!     → outcome.rs (classify whatever came back)
//!     → http layer maps the outcome to a client response
//! ```
//!
//! # Design Decisions
//! - One pooled client built at startup; never re-created per call
//! - Classification runs strictly after all transport-level retries
//! - The skip-interstitial header is a hint; correctness comes from
//!   body-shape classification

pub mod client;
pub mod gateway;
pub mod outcome;

pub use client::{RawResponse, TransportError, UpstreamClient};
pub use gateway::{ForwardError, ForwardingGateway};
pub use outcome::UpstreamOutcome;
