//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + CLI/env overrides
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → handed explicitly to translator, invoker, CORS policy, server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changing the upstream is a redeploy
//! - All fields have defaults so an empty file is a valid config
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    BrowserConfig, CorsConfig, ListenerConfig, ObservabilityConfig, RelayConfig, SecurityConfig,
    UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
