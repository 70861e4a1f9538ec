//! Transparent CORS relay library.
//!
//! Forwards browser requests made under `/proxy` to one fixed upstream
//! site, presenting them as a regular browser, and returns the upstream
//! answer with permissive CORS headers attached.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod resilience;
pub mod security;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::Relay;
