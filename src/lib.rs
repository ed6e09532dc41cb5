//! VisionFlux Relay
//!
//! A small forwarding gateway that sits between the VisionFlux web UI and a
//! tunnel-exposed Colab inference server.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                   RELAY                      │
//!                    │                                              │
//!   Client Request   │  ┌─────────┐    ┌──────────┐    ┌─────────┐ │
//!   ─────────────────┼─▶│  http   │───▶│ upstream │───▶│upstream │─┼──▶ Colab
//!                    │  │ server  │    │ gateway  │    │ client  │ │    Server
//!                    │  └─────────┘    └──────────┘    └────┬────┘ │  (via ngrok)
//!                    │                                      │      │
//!   Client Response  │  ┌─────────┐    ┌──────────┐         │      │
//!   ◀────────────────┼──│ 2xx/400 │◀───│ classify │◀────────┘      │
//!                    │  │  /502   │    │ outcome  │                │
//!                    │  └─────────┘    └──────────┘                │
//!                    │                                             │
//!                    │  ┌────────────────────────────────────────┐ │
//!                    │  │         Cross-Cutting Concerns         │ │
//!                    │  │  ┌────────┐ ┌────────────┐ ┌─────────┐ │ │
//!                    │  │  │ config │ │ resilience │ │observa- │ │ │
//!                    │  │  │        │ │retry/backoff│ │ bility │ │ │
//!                    │  │  └────────┘ └────────────┘ └─────────┘ │ │
//!                    │  └────────────────────────────────────────┘ │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! The relay exposes three routes (`POST /proxy/generate`, `POST /proxy/test`,
//! `GET /`), forwards to a caller-supplied Colab base URL, retries transient
//! upstream failures with jittered exponential backoff, and classifies every
//! outcome so the UI can tell "upstream is down" apart from "upstream answered
//! with something that is not the expected payload" (typically an ngrok
//! interstitial page).

// Core subsystems
pub mod config;
pub mod http;
pub mod upstream;

// Cross-cutting concerns
pub mod observability;
pub mod resilience;

pub use config::RelayConfig;
pub use http::HttpServer;
