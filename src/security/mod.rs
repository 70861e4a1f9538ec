//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Any response produced by the relay
//!     → cors.rs (add Access-Control-* headers)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - CORS headers go on every response, errors and 404s included
//! - Callers are not authenticated; their headers never reach the upstream
//!   except Content-Type and Cookie (see `relay::translator`)

pub mod cors;

pub use cors::{cors_middleware, CorsPolicy};
