//! Observability subsystem.
//!
//! Structured logs go through `tracing` (initialised in `main`); counters
//! and latency histograms go through `metrics.rs` and are scraped from a
//! Prometheus endpoint on a separate port.

pub mod metrics;
