//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → passed to the server and gateway at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults so a config file is optional
//! - Validation separates syntactic (serde) from semantic checks and
//!   reports every problem it finds, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::load_config;
pub use schema::RelayConfig;
pub use schema::RetryConfig;
pub use schema::TimeoutConfig;
