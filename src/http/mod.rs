//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, body limit)
//!     → GET / and /health      → health.rs
//!     → OPTIONS /proxy...      → response.rs (204 preflight)
//!     → any other /proxy...    → request.rs (InboundRequest)
//!                              → relay core
//!                              → response.rs (OutboundResponse → Response)
//!     → anything else          → 404
//!     → CORS response middleware on every path
//! ```

pub mod health;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, PROXY_MOUNT};
